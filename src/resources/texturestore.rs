//! Texture registry.
//!
//! Textures are referenced through [`TextureHandle`]s. A handle compares and
//! hashes by the identity of the texture it points to, not by its contents, so
//! two textures loaded with the same name and size are still different keys.
//! This is what the material override cache relies on.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use rustc_hash::FxHashMap;

/// Texture metadata. Pixel data lives with the renderer.
#[derive(Debug)]
pub struct Texture {
    pub name: Arc<str>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Texture {
    /// Size in pixels as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Shared, identity-compared handle to a [`Texture`].
#[derive(Clone)]
pub struct TextureHandle(Arc<Texture>);

impl TextureHandle {
    pub fn new(texture: Texture) -> Self {
        Self(Arc::new(texture))
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TextureHandle {}

impl Hash for TextureHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl Deref for TextureHandle {
    type Target = Texture;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TextureHandle({:?} {}x{} @{:p})",
            self.0.name,
            self.0.width,
            self.0.height,
            Arc::as_ptr(&self.0)
        )
    }
}

/// Loaded textures keyed by name.
#[derive(Resource, Debug, Default)]
pub struct TextureStore {
    map: FxHashMap<String, TextureHandle>,
}

impl TextureStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture under `name` and return its handle.
    ///
    /// Loading a name twice replaces the entry with a brand new texture
    /// identity, the same way a reimported asset would.
    pub fn load(&mut self, name: &str, width: u32, height: u32) -> TextureHandle {
        let handle = TextureHandle::new(Texture {
            name: Arc::from(name),
            width,
            height,
        });
        self.map.insert(name.to_string(), handle.clone());
        handle
    }

    /// Get a texture handle by name.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&TextureHandle> {
        self.map.get(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
