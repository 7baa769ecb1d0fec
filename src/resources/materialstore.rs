//! Material storage resource.
//!
//! Materials are addressed by [`MaterialId`]. Ids are never reused, so a
//! destroyed material's id stays dead and [`MaterialStore::contains`] is a
//! reliable liveness check for handles held elsewhere.
//!
//! Materials created with [`MaterialStore::instantiate`] are runtime
//! instances. An editor reload destroys all of them at once through
//! [`MaterialStore::destroy_instances`], while authored materials survive.

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::resources::overridecache::{OverrideAssets, OverrideCache, OverrideError};
use crate::resources::texturestore::TextureHandle;

/// Default name of the texture slot sprites sample from.
pub const DEFAULT_MAIN_TEXTURE_SLOT: &str = "_MainTex";

/// Stable identifier of a material in the [`MaterialStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// A shader plus its bound textures and scalar properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub shader: String,
    pub textures: FxHashMap<String, TextureHandle>,
    pub floats: FxHashMap<String, f32>,
}

impl Material {
    pub fn new(name: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: shader.into(),
            textures: FxHashMap::default(),
            floats: FxHashMap::default(),
        }
    }

    pub fn set_texture(&mut self, slot: impl Into<String>, texture: TextureHandle) {
        self.textures.insert(slot.into(), texture);
    }

    pub fn texture(&self, slot: &str) -> Option<&TextureHandle> {
        self.textures.get(slot)
    }

    pub fn set_float(&mut self, name: impl Into<String>, value: f32) {
        self.floats.insert(name.into(), value);
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }
}

/// All live materials.
#[derive(Resource, Debug, Default)]
pub struct MaterialStore {
    materials: FxHashMap<MaterialId, Material>,
    names: FxHashMap<String, MaterialId>,
    instances: FxHashSet<MaterialId>,
    next_id: u32,
}

impl MaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.next_id);
        self.next_id += 1;
        self.materials.insert(id, material);
        id
    }

    /// Add an authored material, addressable by its name.
    ///
    /// A later material with the same name takes over the name; the earlier
    /// one stays alive under its id.
    pub fn add(&mut self, material: Material) -> MaterialId {
        let name = material.name.clone();
        let id = self.allocate(material);
        self.names.insert(name, id);
        id
    }

    /// Clone `template` into a new runtime instance.
    ///
    /// Returns `None` if the template is not alive.
    pub fn instantiate(&mut self, template: MaterialId) -> Option<MaterialId> {
        let mut material = self.materials.get(&template)?.clone();
        material.name = format!("{} (Instance)", material.name);
        let id = self.allocate(material);
        self.instances.insert(id);
        Some(id)
    }

    pub fn id_of(&self, name: impl AsRef<str>) -> Option<MaterialId> {
        self.names
            .get(name.as_ref())
            .copied()
            .filter(|id| self.materials.contains_key(id))
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(&id)
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        self.materials.contains_key(&id)
    }

    pub fn is_instance(&self, id: MaterialId) -> bool {
        self.instances.contains(&id)
    }

    /// Destroy a material. Returns whether it was alive.
    pub fn destroy(&mut self, id: MaterialId) -> bool {
        self.instances.remove(&id);
        self.materials.remove(&id).is_some()
    }

    /// Destroy every runtime instance and return how many were destroyed.
    pub fn destroy_instances(&mut self) -> usize {
        let count = self.instances.len();
        for id in self.instances.drain() {
            self.materials.remove(&id);
        }
        debug!("Destroyed {} material instances", count);
        count
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

/// Per-texture material overrides, keyed by texture identity.
#[derive(Resource, Debug, Default)]
pub struct MaterialOverrides {
    pub cache: OverrideCache<TextureHandle, MaterialId>,
}

impl MaterialOverrides {
    pub fn new(validate_entries: bool) -> Self {
        Self {
            cache: OverrideCache::with_validation(validate_entries),
        }
    }
}

/// Builds texture overrides out of a [`MaterialStore`]: the template is
/// instantiated and the base texture bound into `slot`.
pub struct MaterialOverrideAssets<'a> {
    store: &'a mut MaterialStore,
    slot: &'a str,
}

impl<'a> MaterialOverrideAssets<'a> {
    pub fn new(store: &'a mut MaterialStore, slot: &'a str) -> Self {
        Self { store, slot }
    }
}

impl OverrideAssets for MaterialOverrideAssets<'_> {
    type Base = TextureHandle;
    type Template = MaterialId;
    type Derived = MaterialId;

    fn is_valid(&self, derived: &MaterialId) -> bool {
        self.store.contains(*derived)
    }

    fn create_override(
        &mut self,
        base: &TextureHandle,
        template: &MaterialId,
    ) -> Result<MaterialId, OverrideError> {
        let id = self
            .store
            .instantiate(*template)
            .ok_or_else(|| OverrideError::template_unavailable(template))?;
        if let Some(material) = self.store.get_mut(id) {
            material.set_texture(self.slot, base.clone());
        }
        debug!(
            "Created material override {:?} of {:?} for texture {:?}",
            id, template, base.name
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::texturestore::TextureStore;

    #[test]
    fn test_add_and_lookup_by_name() {
        let mut store = MaterialStore::new();
        let id = store.add(Material::new("sprite", "Sprites/Default"));
        assert_eq!(store.id_of("sprite"), Some(id));
        assert_eq!(store.get(id).unwrap().shader, "Sprites/Default");
        assert!(!store.is_instance(id));
    }

    #[test]
    fn test_instantiate_clones_template() {
        let mut textures = TextureStore::new();
        let tex = textures.load("atlas", 64, 64);
        let mut store = MaterialStore::new();
        let mut template = Material::new("sprite", "Sprites/Default");
        template.set_float("_Cutoff", 0.5);
        template.set_texture(DEFAULT_MAIN_TEXTURE_SLOT, tex.clone());
        let template = store.add(template);

        let instance = store.instantiate(template).unwrap();
        assert_ne!(instance, template);
        assert!(store.is_instance(instance));
        let clone = store.get(instance).unwrap();
        assert_eq!(clone.name, "sprite (Instance)");
        assert_eq!(clone.float("_Cutoff"), Some(0.5));
        assert_eq!(clone.texture(DEFAULT_MAIN_TEXTURE_SLOT), Some(&tex));
    }

    #[test]
    fn test_instantiate_missing_template() {
        let mut store = MaterialStore::new();
        assert_eq!(store.instantiate(MaterialId(42)), None);
    }

    #[test]
    fn test_destroyed_ids_are_not_reused() {
        let mut store = MaterialStore::new();
        let a = store.add(Material::new("a", "s"));
        assert!(store.destroy(a));
        assert!(!store.destroy(a));
        let b = store.add(Material::new("b", "s"));
        assert_ne!(a, b);
        assert!(!store.contains(a));
        assert_eq!(store.id_of("a"), None);
    }

    #[test]
    fn test_destroy_instances_keeps_authored_materials() {
        let mut store = MaterialStore::new();
        let template = store.add(Material::new("sprite", "s"));
        let i1 = store.instantiate(template).unwrap();
        let i2 = store.instantiate(template).unwrap();

        assert_eq!(store.destroy_instances(), 2);
        assert!(store.contains(template));
        assert!(!store.contains(i1));
        assert!(!store.contains(i2));
        assert_eq!(store.instance_count(), 0);
    }

    #[test]
    fn test_override_binds_texture_into_slot() {
        let mut textures = TextureStore::new();
        let tex = textures.load("atlas", 64, 64);
        let mut store = MaterialStore::new();
        let template = store.add(Material::new("sprite", "s"));

        let mut assets = MaterialOverrideAssets::new(&mut store, "_BaseMap");
        let id = assets.create_override(&tex, &template).unwrap();
        assert!(assets.is_valid(&id));
        assert_eq!(store.get(id).unwrap().texture("_BaseMap"), Some(&tex));
        assert_eq!(store.get(template).unwrap().texture("_BaseMap"), None);
    }
}
