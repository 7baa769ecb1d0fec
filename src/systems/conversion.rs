//! Authoring conversion.
//!
//! Turns [`SpriteRendererAuthoring`] data into the components the sprite
//! renderer reads. The only non-trivial step is the optional texture
//! override, which goes through the [`MaterialOverrides`] cache so that all
//! sprites sharing a texture also share one overridden material.
//!
//! Components written for every converted entity:
//! - [`SpriteRenderable`], plus [`Transform2D`] when transform components are
//!   kept
//! - [`VisualSortingTag`], [`SortingIndex`], [`SortingLayer`] unless sorting is
//!   disabled, and [`SortingStaticTag`] for static sorting
//! - [`SortingValue`], [`Pivot`], [`Scale2D`], [`MainTexSt`],
//!   [`MainTexStInitial`]
//! - [`SpriteRenderDataToRegister`]

use bevy_ecs::prelude::*;
use log::{info, warn};
use thiserror::Error;

use crate::components::authoring::SpriteRendererAuthoring;
use crate::components::maintexst::{MainTexSt, MainTexStInitial};
use crate::components::pivot::Pivot;
use crate::components::scale2d::Scale2D;
use crate::components::sorting::{
    SortingIndex, SortingLayer, SortingStaticTag, SortingValue, VisualSortingTag,
};
use crate::components::spriterender::{
    SpriteRenderData, SpriteRenderDataToRegister, SpriteRenderable, Transform2D,
};
use crate::resources::conversionconfig::ConversionConfig;
use crate::resources::conversionstats::ConversionStats;
use crate::resources::materialstore::{
    DEFAULT_MAIN_TEXTURE_SLOT, MaterialId, MaterialOverrideAssets, MaterialOverrides,
    MaterialStore,
};
use crate::resources::overridecache::OverrideError;
use crate::resources::spritestore::SpriteStore;
use crate::resources::texturestore::TextureHandle;

/// Reasons a single authored object could not be converted.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("entity {0:?} does not exist")]
    MissingEntity(Entity),

    #[error("resource {0} is not present in the world")]
    MissingResource(&'static str),

    #[error("unknown sprite: {0}")]
    UnknownSprite(String),

    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    #[error(transparent)]
    Override(#[from] OverrideError),
}

impl SpriteRendererAuthoring {
    /// Write the render components for this authoring data onto `entity`.
    ///
    /// Nothing is written if any lookup fails.
    pub fn convert(&self, world: &mut World, entity: Entity) -> Result<(), ConversionError> {
        if world.get_entity(entity).is_err() {
            return Err(ConversionError::MissingEntity(entity));
        }

        let sprite = world
            .get_resource::<SpriteStore>()
            .ok_or(ConversionError::MissingResource("SpriteStore"))?
            .get(&self.sprite)
            .cloned()
            .ok_or_else(|| ConversionError::UnknownSprite(self.sprite.clone()))?;

        let template = world
            .get_resource::<MaterialStore>()
            .ok_or(ConversionError::MissingResource("MaterialStore"))?
            .id_of(&self.render_data.material)
            .ok_or_else(|| ConversionError::UnknownMaterial(self.render_data.material.clone()))?;

        let material = if self.override_sprite_texture {
            resolve_texture_override(world, &sprite.texture, template)?
        } else {
            template
        };

        let texture_st = sprite.texture_st();
        let visual_size = self.visual_size(&sprite);

        let mut entity_mut = world
            .get_entity_mut(entity)
            .map_err(|_| ConversionError::MissingEntity(entity))?;

        entity_mut.insert(SpriteRenderable);
        if !self.exclude_transform_components {
            entity_mut.insert(Transform2D::default());
        }

        if !self.disable_sorting {
            entity_mut.insert((
                VisualSortingTag,
                SortingIndex(self.sorting_index),
                SortingLayer(self.sorting_layer),
            ));
            if self.static_sorting {
                entity_mut.insert(SortingStaticTag);
            }
        }

        entity_mut.insert((
            SortingValue::default(),
            Pivot { value: self.pivot },
            Scale2D { value: visual_size },
            MainTexSt { value: texture_st },
            MainTexStInitial { value: texture_st },
            SpriteRenderDataToRegister {
                data: SpriteRenderData::new(
                    material,
                    self.render_data.properties_set.as_str(),
                ),
            },
        ));

        Ok(())
    }
}

/// Get the material overriding `template` for `texture`, creating it if needed.
///
/// Requires the [`MaterialOverrides`] and [`MaterialStore`] resources. The
/// texture slot comes from [`ConversionConfig`] when present.
pub fn resolve_texture_override(
    world: &mut World,
    texture: &TextureHandle,
    template: MaterialId,
) -> Result<MaterialId, ConversionError> {
    let slot = world
        .get_resource::<ConversionConfig>()
        .map(|c| c.main_texture_slot.clone())
        .unwrap_or_else(|| DEFAULT_MAIN_TEXTURE_SLOT.to_string());

    if !world.contains_resource::<MaterialOverrides>() {
        return Err(ConversionError::MissingResource("MaterialOverrides"));
    }
    if !world.contains_resource::<MaterialStore>() {
        return Err(ConversionError::MissingResource("MaterialStore"));
    }

    world.resource_scope(|world, mut overrides: Mut<MaterialOverrides>| {
        let mut store = world.resource_mut::<MaterialStore>();
        let mut assets = MaterialOverrideAssets::new(&mut store, &slot);
        overrides
            .cache
            .get_or_create(&mut assets, texture, &template)
            .map_err(ConversionError::from)
    })
}

/// Exclusive system converting every entity that holds a
/// [`SpriteRendererAuthoring`].
///
/// The authoring component is removed afterwards whether conversion worked
/// or not, so a broken object is reported once instead of every frame.
pub fn convert_sprite_authoring(world: &mut World) {
    let pending: Vec<(Entity, SpriteRendererAuthoring)> = {
        let mut q = world.query::<(Entity, &SpriteRendererAuthoring)>();
        q.iter(world).map(|(e, a)| (e, a.clone())).collect()
    };
    if pending.is_empty() {
        return;
    }

    let mut converted = 0;
    let mut failed = 0;
    for (entity, authoring) in pending {
        match authoring.convert(world, entity) {
            Ok(()) => converted += 1,
            Err(e) => {
                warn!("Failed to convert sprite '{}' on {:?}: {}", authoring.sprite, entity, e);
                failed += 1;
            }
        }
        if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
            entity_mut.remove::<SpriteRendererAuthoring>();
        }
    }

    let mut stats = world.get_resource_or_insert_with(ConversionStats::default);
    stats.converted += converted;
    stats.failed += failed;
    info!("Converted {} sprite renderers ({} failed)", converted, failed);
}
