//! Components consumed by the sprite renderer.
//!
//! The conversion pass attaches [`SpriteRenderable`] and a
//! [`SpriteRenderDataToRegister`]. The registration system later swaps the
//! latter for a [`RenderArchetypeIndex`] pointing into
//! [`RenderArchetypes`](crate::resources::renderarchetypes::RenderArchetypes).

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::resources::materialstore::MaterialId;

/// Property set used when the authored render data doesn't name one.
pub const DEFAULT_PROPERTIES_SET: &str = "default";

/// Marker for entities drawn by the sprite renderer.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct SpriteRenderable;

/// Plain 2D transform, added only when the authored object keeps its
/// transform components.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

/// Material and per-instance property layout a sprite is drawn with.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpriteRenderData {
    pub material: MaterialId,
    /// Name of the instanced property set the shader expects.
    pub properties_set: Arc<str>,
}

impl SpriteRenderData {
    pub fn new(material: MaterialId, properties_set: impl Into<Arc<str>>) -> Self {
        Self {
            material,
            properties_set: properties_set.into(),
        }
    }
}

/// Render data waiting for registration.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct SpriteRenderDataToRegister {
    pub data: SpriteRenderData,
}

/// Index of the entity's render archetype after registration.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderArchetypeIndex(pub usize);
