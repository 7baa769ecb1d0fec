//! Material override cache tests against the real material store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use spriteforge::resources::materialstore::{
    DEFAULT_MAIN_TEXTURE_SLOT, Material, MaterialId, MaterialOverrideAssets, MaterialOverrides,
    MaterialStore,
};
use spriteforge::resources::overridecache::{
    OverrideAssets, OverrideError, SharedOverrideCache,
};
use spriteforge::resources::texturestore::{TextureHandle, TextureStore};

struct Fixture {
    textures: TextureStore,
    materials: MaterialStore,
    overrides: MaterialOverrides,
    template: MaterialId,
}

impl Fixture {
    fn new() -> Self {
        let mut materials = MaterialStore::new();
        let mut template = Material::new("sprite", "Sprites/Instanced");
        template.set_float("_Cutoff", 0.25);
        let template = materials.add(template);
        Self {
            textures: TextureStore::new(),
            materials,
            overrides: MaterialOverrides::new(true),
            template,
        }
    }

    fn request(&mut self, texture: &TextureHandle) -> Result<MaterialId, OverrideError> {
        let mut assets = MaterialOverrideAssets::new(&mut self.materials, DEFAULT_MAIN_TEXTURE_SLOT);
        self.overrides
            .cache
            .get_or_create(&mut assets, texture, &self.template)
    }

    fn main_texture(&self, id: MaterialId) -> Option<&TextureHandle> {
        self.materials
            .get(id)
            .and_then(|m| m.texture(DEFAULT_MAIN_TEXTURE_SLOT))
    }
}

#[test]
fn same_texture_returns_same_material() {
    let mut fx = Fixture::new();
    let tex_a = fx.textures.load("a", 64, 64);

    let m1 = fx.request(&tex_a).unwrap();
    let again = fx.request(&tex_a).unwrap();
    assert_eq!(m1, again);
    // template + one instance
    assert_eq!(fx.materials.len(), 2);
}

#[test]
fn different_textures_get_their_own_material() {
    let mut fx = Fixture::new();
    let tex_a = fx.textures.load("a", 64, 64);
    let tex_b = fx.textures.load("b", 64, 64);

    let m1 = fx.request(&tex_a).unwrap();
    let m1_again = fx.request(&tex_a).unwrap();
    let m2 = fx.request(&tex_b).unwrap();

    assert_eq!(m1, m1_again);
    assert_ne!(m1, m2);
    assert_eq!(fx.main_texture(m1), Some(&tex_a));
    assert_eq!(fx.main_texture(m2), Some(&tex_b));
}

#[test]
fn identical_content_textures_are_cached_separately() {
    let mut fx = Fixture::new();
    let first = fx.textures.load("atlas", 128, 128);
    let second = fx.textures.load("atlas", 128, 128);

    let m1 = fx.request(&first).unwrap();
    let m2 = fx.request(&second).unwrap();
    assert_ne!(m1, m2);
    assert_eq!(fx.overrides.cache.len(), 2);
}

#[test]
fn overrides_are_clones_not_shared() {
    let mut fx = Fixture::new();
    let tex_a = fx.textures.load("a", 64, 64);
    let tex_b = fx.textures.load("b", 64, 64);
    let m1 = fx.request(&tex_a).unwrap();
    let m2 = fx.request(&tex_b).unwrap();

    fx.materials.get_mut(m1).unwrap().set_float("_Cutoff", 0.9);

    assert_eq!(fx.materials.get(m1).unwrap().float("_Cutoff"), Some(0.9));
    assert_eq!(fx.materials.get(m2).unwrap().float("_Cutoff"), Some(0.25));
    let template = fx.materials.get(fx.template).unwrap();
    assert_eq!(template.float("_Cutoff"), Some(0.25));
    assert_eq!(template.texture(DEFAULT_MAIN_TEXTURE_SLOT), None);
}

#[test]
fn destroyed_override_is_rebuilt_and_replaced() {
    let mut fx = Fixture::new();
    let tex_a = fx.textures.load("a", 64, 64);
    let m1 = fx.request(&tex_a).unwrap();

    assert_eq!(fx.materials.destroy_instances(), 1);
    assert_eq!(fx.overrides.cache.get(&tex_a), Some(&m1));

    let m1_new = fx.request(&tex_a).unwrap();
    assert_ne!(m1, m1_new);
    assert!(fx.materials.contains(m1_new));
    assert_eq!(fx.main_texture(m1_new), Some(&tex_a));
    assert_eq!(fx.overrides.cache.get(&tex_a), Some(&m1_new));
    assert_eq!(fx.overrides.cache.len(), 1);

    let stats = fx.overrides.cache.stats();
    assert_eq!(stats.created, 1);
    assert_eq!(stats.repaired, 1);

    // repaired entry is served from the cache afterwards
    assert_eq!(fx.request(&tex_a).unwrap(), m1_new);
}

#[test]
fn destroyed_template_is_reported() {
    let mut fx = Fixture::new();
    let tex_a = fx.textures.load("a", 64, 64);
    fx.materials.destroy(fx.template);

    let err = fx.request(&tex_a).unwrap_err();
    assert!(matches!(err, OverrideError::TemplateUnavailable { .. }));
    assert!(fx.overrides.cache.is_empty());
}

#[test]
fn cached_override_survives_template_loss() {
    let mut fx = Fixture::new();
    let tex_a = fx.textures.load("a", 64, 64);
    let m1 = fx.request(&tex_a).unwrap();
    fx.materials.destroy(fx.template);

    assert_eq!(fx.request(&tex_a).unwrap(), m1);
}

/// Assets that count creations and sleep a little inside creation so racing
/// threads would overlap without the cache's lock.
struct CountingAssets {
    created: Arc<AtomicUsize>,
}

impl OverrideAssets for CountingAssets {
    type Base = u32;
    type Template = &'static str;
    type Derived = (u32, usize);

    fn is_valid(&self, _derived: &(u32, usize)) -> bool {
        true
    }

    fn create_override(
        &mut self,
        base: &u32,
        _template: &&'static str,
    ) -> Result<(u32, usize), OverrideError> {
        let n = self.created.fetch_add(1, Ordering::SeqCst);
        thread::sleep(std::time::Duration::from_millis(1));
        Ok((*base, n))
    }
}

#[test]
fn shared_cache_creates_once_per_base_across_threads() {
    let created = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(SharedOverrideCache::new(
        CountingAssets {
            created: Arc::clone(&created),
        },
        false,
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                (0..4u32)
                    .map(|base| cache.get_or_create(&base, &"sprite").unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<(u32, usize)>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(created.load(Ordering::SeqCst), 4);
    assert_eq!(cache.len(), 4);
    for r in &results[1..] {
        assert_eq!(r, &results[0]);
    }
    let stats = cache.stats();
    assert_eq!(stats.created, 4);
    assert_eq!(stats.hits, 28);
}
