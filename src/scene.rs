//! Scene description files.
//!
//! A scene is a JSON document listing the assets the conversion pass needs
//! and the authored sprite objects to convert:
//!
//! ```json
//! {
//!   "textures":  [{ "name": "atlas", "width": 256, "height": 256 }],
//!   "sprites":   [{ "name": "hero", "texture": "atlas",
//!                   "rect": { "x": 0, "y": 0, "width": 32, "height": 32 } }],
//!   "materials": [{ "name": "sprite", "shader": "Sprites/Instanced" }],
//!   "objects":   [{ "name": "Hero", "authoring": {
//!                   "sprite": "hero", "render_data": { "material": "sprite" },
//!                   "override_sprite_texture": true } }]
//! }
//! ```
//!
//! Assets go into the [`TextureStore`], [`SpriteStore`] and [`MaterialStore`]
//! resources; every object becomes an entity holding its
//! [`SpriteRendererAuthoring`] and an [`ObjectName`].

use std::path::Path;

use bevy_ecs::prelude::*;
use log::info;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::authoring::SpriteRendererAuthoring;
use crate::components::objectname::ObjectName;
use crate::resources::materialstore::{Material, MaterialStore};
use crate::resources::spritestore::{SpriteAsset, SpriteRect, SpriteStore};
use crate::resources::texturestore::TextureStore;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("sprite '{sprite}' references unknown texture '{texture}'")]
    UnknownTexture { sprite: String, texture: String },

    #[error("material '{material}' binds unknown texture '{texture}'")]
    UnknownMaterialTexture { material: String, texture: String },

    #[error("object '{object}' references unknown sprite '{sprite}'")]
    UnknownSprite { object: String, sprite: String },

    #[error("object '{object}' references unknown material '{material}'")]
    UnknownMaterial { object: String, material: String },

    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TextureDesc {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpriteDesc {
    pub name: String,
    pub texture: String,
    pub rect: SpriteRect,
    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub pixels_per_unit: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MaterialDesc {
    pub name: String,
    pub shader: String,
    /// Texture slot -> texture name.
    #[serde(default)]
    pub textures: FxHashMap<String, String>,
    #[serde(default)]
    pub floats: FxHashMap<String, f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObjectDesc {
    pub name: String,
    pub authoring: SpriteRendererAuthoring,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub textures: Vec<TextureDesc>,
    #[serde(default)]
    pub sprites: Vec<SpriteDesc>,
    #[serde(default)]
    pub materials: Vec<MaterialDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
}

fn check_unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a String>,
) -> Result<(), SceneError> {
    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(SceneError::DuplicateName {
                kind,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

impl SceneDescription {
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check asset names are unique and cross references resolve.
    pub fn validate(&self) -> Result<(), SceneError> {
        check_unique("texture", self.textures.iter().map(|t| &t.name))?;
        check_unique("sprite", self.sprites.iter().map(|s| &s.name))?;
        check_unique("material", self.materials.iter().map(|m| &m.name))?;

        let textures: FxHashSet<&str> = self.textures.iter().map(|t| t.name.as_str()).collect();
        for sprite in &self.sprites {
            if !textures.contains(sprite.texture.as_str()) {
                return Err(SceneError::UnknownTexture {
                    sprite: sprite.name.clone(),
                    texture: sprite.texture.clone(),
                });
            }
        }
        for material in &self.materials {
            for texture in material.textures.values() {
                if !textures.contains(texture.as_str()) {
                    return Err(SceneError::UnknownMaterialTexture {
                        material: material.name.clone(),
                        texture: texture.clone(),
                    });
                }
            }
        }

        let sprites: FxHashSet<&str> = self.sprites.iter().map(|s| s.name.as_str()).collect();
        let materials: FxHashSet<&str> = self.materials.iter().map(|m| m.name.as_str()).collect();
        for object in &self.objects {
            let authoring = &object.authoring;
            if !sprites.contains(authoring.sprite.as_str()) {
                return Err(SceneError::UnknownSprite {
                    object: object.name.clone(),
                    sprite: authoring.sprite.clone(),
                });
            }
            if !materials.contains(authoring.render_data.material.as_str()) {
                return Err(SceneError::UnknownMaterial {
                    object: object.name.clone(),
                    material: authoring.render_data.material.clone(),
                });
            }
        }
        Ok(())
    }

    /// Load the scene's textures, sprites and materials into the world's
    /// stores, creating the stores if they are missing.
    ///
    /// `default_pixels_per_unit` applies to sprites without their own value.
    pub fn spawn_assets(
        &self,
        world: &mut World,
        default_pixels_per_unit: f32,
    ) -> Result<(), SceneError> {
        self.validate()?;
        world.init_resource::<TextureStore>();
        world.init_resource::<SpriteStore>();
        world.init_resource::<MaterialStore>();

        let mut loaded = FxHashMap::default();
        {
            let mut textures = world.resource_mut::<TextureStore>();
            for desc in &self.textures {
                let handle = textures.load(&desc.name, desc.width, desc.height);
                loaded.insert(desc.name.as_str(), handle);
            }
        }

        {
            let mut sprites = world.resource_mut::<SpriteStore>();
            for desc in &self.sprites {
                // validate() guarantees the texture exists
                let Some(texture) = loaded.get(desc.texture.as_str()) else {
                    continue;
                };
                let ppu = desc.pixels_per_unit.unwrap_or(default_pixels_per_unit);
                sprites.insert(
                    desc.name.clone(),
                    SpriteAsset::new(texture.clone(), desc.rect, ppu),
                );
            }
        }

        {
            let mut materials = world.resource_mut::<MaterialStore>();
            for desc in &self.materials {
                let mut material = Material::new(desc.name.clone(), desc.shader.clone());
                for (slot, texture) in &desc.textures {
                    if let Some(handle) = loaded.get(texture.as_str()) {
                        material.set_texture(slot.clone(), handle.clone());
                    }
                }
                for (name, value) in &desc.floats {
                    material.set_float(name.clone(), *value);
                }
                materials.add(material);
            }
        }

        info!(
            "Loaded {} textures, {} sprites, {} materials",
            self.textures.len(),
            self.sprites.len(),
            self.materials.len()
        );
        Ok(())
    }

    /// Spawn one entity per authored object, ready for conversion.
    pub fn spawn_objects(&self, world: &mut World) -> Vec<Entity> {
        self.objects
            .iter()
            .map(|obj| {
                world
                    .spawn((ObjectName::new(obj.name.as_str()), obj.authoring.clone()))
                    .id()
            })
            .collect()
    }

    /// [`spawn_assets`](Self::spawn_assets) followed by
    /// [`spawn_objects`](Self::spawn_objects).
    pub fn spawn_into(
        &self,
        world: &mut World,
        default_pixels_per_unit: f32,
    ) -> Result<Vec<Entity>, SceneError> {
        self.spawn_assets(world, default_pixels_per_unit)?;
        Ok(self.spawn_objects(world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "textures": [
            { "name": "atlas", "width": 256, "height": 128 },
            { "name": "props", "width": 64, "height": 64 }
        ],
        "sprites": [
            { "name": "hero", "texture": "atlas",
              "rect": { "x": 0, "y": 0, "width": 32, "height": 64 } },
            { "name": "crate", "texture": "props",
              "rect": { "x": 0, "y": 0, "width": 64, "height": 64 },
              "pixels_per_unit": 64 }
        ],
        "materials": [
            { "name": "sprite", "shader": "Sprites/Instanced",
              "textures": { "_MainTex": "atlas" }, "floats": { "_Cutoff": 0.5 } }
        ],
        "objects": [
            { "name": "Hero", "authoring": { "sprite": "hero",
              "render_data": { "material": "sprite" } } }
        ]
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = SceneDescription::from_json_str(SCENE).unwrap();
        assert_eq!(scene.textures.len(), 2);
        assert_eq!(scene.sprites[1].pixels_per_unit, Some(64.0));
        assert_eq!(scene.materials[0].textures["_MainTex"], "atlas");
        assert_eq!(scene.objects[0].authoring.sprite, "hero");
        scene.validate().unwrap();
    }

    #[test]
    fn test_spawn_assets_fills_stores() {
        let scene = SceneDescription::from_json_str(SCENE).unwrap();
        let mut world = World::new();
        let entities = scene.spawn_into(&mut world, 100.0).unwrap();
        assert_eq!(entities.len(), 1);

        let sprites = world.resource::<SpriteStore>();
        assert_eq!(sprites.get("hero").unwrap().pixels_per_unit, 100.0);
        assert_eq!(sprites.get("crate").unwrap().pixels_per_unit, 64.0);

        let atlas = world.resource::<TextureStore>().get("atlas").cloned().unwrap();
        let materials = world.resource::<MaterialStore>();
        let id = materials.id_of("sprite").unwrap();
        let material = materials.get(id).unwrap();
        assert_eq!(material.texture("_MainTex"), Some(&atlas));
        assert_eq!(material.float("_Cutoff"), Some(0.5));

        let name = world.get::<ObjectName>(entities[0]).unwrap();
        assert_eq!(name.as_str(), "Hero");
        assert!(world.get::<SpriteRendererAuthoring>(entities[0]).is_some());
    }

    #[test]
    fn test_unknown_texture_is_rejected() {
        let json = r#"{ "sprites": [ { "name": "hero", "texture": "nope",
            "rect": { "x": 0, "y": 0, "width": 1, "height": 1 } } ] }"#;
        let scene = SceneDescription::from_json_str(json).unwrap();
        assert!(matches!(
            scene.validate(),
            Err(SceneError::UnknownTexture { .. })
        ));
    }

    #[test]
    fn test_object_with_unknown_sprite_is_rejected() {
        let mut scene = SceneDescription::from_json_str(SCENE).unwrap();
        scene.objects[0].authoring.sprite = "heor".to_string();
        match scene.validate() {
            Err(SceneError::UnknownSprite { object, sprite }) => {
                assert_eq!(object, "Hero");
                assert_eq!(sprite, "heor");
            }
            other => panic!("expected UnknownSprite, got {:?}", other),
        }
    }

    #[test]
    fn test_object_with_unknown_material_is_rejected() {
        let mut scene = SceneDescription::from_json_str(SCENE).unwrap();
        scene.objects[0].authoring.render_data.material = "sprtie".to_string();
        assert!(matches!(
            scene.validate(),
            Err(SceneError::UnknownMaterial { ref material, .. }) if material == "sprtie"
        ));

        let mut world = World::new();
        assert!(scene.spawn_into(&mut world, 100.0).is_err());
        let mut q = world.query::<&ObjectName>();
        assert_eq!(q.iter(&world).count(), 0);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let json = r#"{ "textures": [
            { "name": "atlas", "width": 1, "height": 1 },
            { "name": "atlas", "width": 2, "height": 2 } ] }"#;
        let scene = SceneDescription::from_json_str(json).unwrap();
        assert!(matches!(
            scene.validate(),
            Err(SceneError::DuplicateName { kind: "texture", .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SceneDescription::from_json_str("{ not json"),
            Err(SceneError::Parse(_))
        ));
    }
}
