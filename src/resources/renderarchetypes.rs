//! Registry of distinct sprite render data.
//!
//! Every converted sprite carries a [`SpriteRenderData`]. Sprites sharing the
//! same material and property set can be drawn in one batch, so registration
//! collapses them into a single archetype and hands back its index.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::components::spriterender::SpriteRenderData;

/// One batchable group of sprites.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderArchetype {
    pub data: SpriteRenderData,
    /// Number of entities registered with this render data.
    pub entity_count: usize,
}

#[derive(Resource, Debug, Default)]
pub struct RenderArchetypes {
    archetypes: Vec<RenderArchetype>,
    index: FxHashMap<SpriteRenderData, usize>,
}

impl RenderArchetypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one entity's render data and return its archetype index.
    pub fn register(&mut self, data: &SpriteRenderData) -> usize {
        if let Some(&i) = self.index.get(data) {
            self.archetypes[i].entity_count += 1;
            return i;
        }
        let i = self.archetypes.len();
        self.archetypes.push(RenderArchetype {
            data: data.clone(),
            entity_count: 1,
        });
        self.index.insert(data.clone(), i);
        i
    }

    pub fn get(&self, index: usize) -> Option<&RenderArchetype> {
        self.archetypes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderArchetype> {
        self.archetypes.iter()
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Forget every archetype.
    pub fn clear(&mut self) {
        self.archetypes.clear();
        self.index.clear();
    }
}
