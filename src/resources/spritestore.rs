//! Sprite asset registry.
//!
//! A sprite is a rectangular region of a texture plus the pixels-per-unit
//! ratio used to turn that region into a size in world units.

use bevy_ecs::prelude::Resource;
use glam::{Vec2, Vec4};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::resources::texturestore::TextureHandle;

/// Region of a texture in pixels, origin at the texture's bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct SpriteRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SpriteRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// A sprite: a texture region with a pixels-per-unit ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAsset {
    pub texture: TextureHandle,
    pub rect: SpriteRect,
    pub pixels_per_unit: f32,
}

impl SpriteAsset {
    pub fn new(texture: TextureHandle, rect: SpriteRect, pixels_per_unit: f32) -> Self {
        Self {
            texture,
            rect,
            pixels_per_unit,
        }
    }

    /// Size of the sprite in world units.
    pub fn bounds_size(&self) -> Vec2 {
        if self.pixels_per_unit <= 0.0 {
            return Vec2::ZERO;
        }
        self.rect.size() / self.pixels_per_unit
    }

    /// Texture scale/offset of the sprite region inside its texture.
    ///
    /// `xy` is the region size and `zw` the region position, both normalized
    /// to the texture size. A zero-sized texture yields all zeros.
    pub fn texture_st(&self) -> Vec4 {
        let tex = self.texture.size();
        if tex.x <= 0.0 || tex.y <= 0.0 {
            return Vec4::ZERO;
        }
        let scale = self.rect.size() / tex;
        let offset = self.rect.position() / tex;
        Vec4::new(scale.x, scale.y, offset.x, offset.y)
    }
}

/// Sprites keyed by name.
#[derive(Resource, Debug, Default)]
pub struct SpriteStore {
    map: FxHashMap<String, SpriteAsset>,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sprite, replacing any previous sprite with the same key.
    pub fn insert(&mut self, key: impl Into<String>, sprite: SpriteAsset) {
        self.map.insert(key.into(), sprite);
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&SpriteAsset> {
        self.map.get(key.as_ref())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::texturestore::TextureStore;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_texture_st_full_texture() {
        let mut textures = TextureStore::new();
        let tex = textures.load("atlas", 256, 128);
        let sprite = SpriteAsset::new(tex, SpriteRect::new(0.0, 0.0, 256.0, 128.0), 100.0);
        assert_eq!(sprite.texture_st(), Vec4::new(1.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn test_texture_st_sub_region() {
        let mut textures = TextureStore::new();
        let tex = textures.load("atlas", 256, 128);
        let sprite = SpriteAsset::new(tex, SpriteRect::new(64.0, 32.0, 32.0, 64.0), 100.0);
        let st = sprite.texture_st();
        assert!(approx_eq(st.x, 0.125));
        assert!(approx_eq(st.y, 0.5));
        assert!(approx_eq(st.z, 0.25));
        assert!(approx_eq(st.w, 0.25));
    }

    #[test]
    fn test_texture_st_zero_sized_texture() {
        let mut textures = TextureStore::new();
        let tex = textures.load("empty", 0, 0);
        let sprite = SpriteAsset::new(tex, SpriteRect::new(0.0, 0.0, 8.0, 8.0), 100.0);
        assert_eq!(sprite.texture_st(), Vec4::ZERO);
    }

    #[test]
    fn test_bounds_size_uses_pixels_per_unit() {
        let mut textures = TextureStore::new();
        let tex = textures.load("atlas", 256, 256);
        let sprite = SpriteAsset::new(tex, SpriteRect::new(0.0, 0.0, 200.0, 50.0), 100.0);
        assert_eq!(sprite.bounds_size(), Vec2::new(2.0, 0.5));
    }

    #[test]
    fn test_bounds_size_invalid_ppu() {
        let mut textures = TextureStore::new();
        let tex = textures.load("atlas", 256, 256);
        let sprite = SpriteAsset::new(tex, SpriteRect::new(0.0, 0.0, 200.0, 50.0), 0.0);
        assert_eq!(sprite.bounds_size(), Vec2::ZERO);
    }
}
