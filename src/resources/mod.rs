//! ECS resources made available to systems.
//!
//! Overview
//! - `conversionconfig` – INI-backed settings of the conversion pass
//! - `conversionstats` – converted/failed totals
//! - `materialstore` – materials by id, plus the per-texture override cache
//! - `overridecache` – generic identity-keyed override cache
//! - `renderarchetypes` – distinct render data of registered sprites
//! - `spritestore` – sprite regions keyed by name
//! - `texturestore` – identity-compared texture handles keyed by name
pub mod conversionconfig;
pub mod conversionstats;
pub mod materialstore;
pub mod overridecache;
pub mod renderarchetypes;
pub mod spritestore;
pub mod texturestore;
