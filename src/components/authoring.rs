//! Authored sprite renderer description.
//!
//! [`SpriteRendererAuthoring`] is what a scene file stores for every sprite
//! object: which sprite to draw, with which material, at what size, and how
//! it sorts. Entities carrying it are turned into render components by
//! [`convert_sprite_authoring`](crate::systems::conversion::convert_sprite_authoring).

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::spriterender::DEFAULT_PROPERTIES_SET;
use crate::resources::spritestore::SpriteAsset;

/// Material and property set as named in the authoring data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpriteRenderDataDesc {
    /// Key of the material in the material store. When the texture override
    /// is enabled this material is the template for the override.
    pub material: String,
    #[serde(default = "default_properties_set")]
    pub properties_set: String,
}

impl SpriteRenderDataDesc {
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            properties_set: default_properties_set(),
        }
    }
}

/// Authoring data for one sprite renderer.
#[derive(Component, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpriteRendererAuthoring {
    /// Key of the sprite in the sprite store.
    pub sprite: String,
    pub render_data: SpriteRenderDataDesc,
    /// Multiplier applied to the sprite's size in world units.
    #[serde(default = "default_scale")]
    pub scale: Vec2,
    /// Draw with a per-texture clone of the material that samples the
    /// sprite's own texture.
    #[serde(default)]
    pub override_sprite_texture: bool,
    #[serde(default = "default_pivot")]
    pub pivot: Vec2,
    #[serde(default)]
    pub disable_sorting: bool,
    /// Use for sprites that never change position, sorting index or layer.
    #[serde(default)]
    pub static_sorting: bool,
    #[serde(default)]
    pub sorting_index: i32,
    #[serde(default)]
    pub sorting_layer: i32,
    #[serde(default = "default_exclude_transform")]
    pub exclude_transform_components: bool,
}

fn default_properties_set() -> String {
    DEFAULT_PROPERTIES_SET.to_string()
}

fn default_scale() -> Vec2 {
    Vec2::ONE
}

fn default_pivot() -> Vec2 {
    Vec2::splat(0.5)
}

fn default_exclude_transform() -> bool {
    true
}

impl SpriteRendererAuthoring {
    /// Authoring data with default settings for `sprite` drawn with `material`.
    pub fn new(sprite: impl Into<String>, material: impl Into<String>) -> Self {
        Self {
            sprite: sprite.into(),
            render_data: SpriteRenderDataDesc::new(material),
            scale: default_scale(),
            override_sprite_texture: false,
            pivot: default_pivot(),
            disable_sorting: false,
            static_sorting: false,
            sorting_index: 0,
            sorting_layer: 0,
            exclude_transform_components: default_exclude_transform(),
        }
    }

    /// Size of the rendered sprite in world units.
    pub fn visual_size(&self, sprite: &SpriteAsset) -> Vec2 {
        sprite.bounds_size() * self.scale
    }
}
