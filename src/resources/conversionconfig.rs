//! Conversion configuration resource.
//!
//! Settings for the authoring conversion pass, loaded from an INI file.
//! Every value has a safe default, so a missing file is not fatal.
//!
//! # Configuration File Format
//!
//! ```ini
//! [overrides]
//! ; true for hosts that can destroy materials behind the cache (editor reload)
//! validate_entries = true
//! main_texture_slot = _MainTex
//!
//! [sprites]
//! pixels_per_unit = 100
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::resources::materialstore::DEFAULT_MAIN_TEXTURE_SLOT;

const DEFAULT_VALIDATE_ENTRIES: bool = true;
const DEFAULT_PIXELS_PER_UNIT: f32 = 100.0;
const DEFAULT_CONFIG_PATH: &str = "./spriteforge.ini";

/// Conversion configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct ConversionConfig {
    /// Check cached overrides for liveness before reusing them.
    pub validate_entries: bool,
    /// Material texture slot that receives the sprite texture on override.
    pub main_texture_slot: String,
    /// Pixels-per-unit for sprites that don't specify their own.
    pub pixels_per_unit: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            validate_entries: DEFAULT_VALIDATE_ENTRIES,
            main_texture_slot: DEFAULT_MAIN_TEXTURE_SLOT.to_string(),
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Non-positive
    /// `pixels_per_unit` is ignored.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [overrides] section
        if let Some(validate) = config.getbool("overrides", "validate_entries").ok().flatten() {
            self.validate_entries = validate;
        }
        if let Some(slot) = config.get("overrides", "main_texture_slot") {
            let slot = slot.trim();
            if !slot.is_empty() {
                self.main_texture_slot = slot.to_string();
            }
        }

        // [sprites] section
        if let Some(ppu) = config.getfloat("sprites", "pixels_per_unit").ok().flatten() {
            if ppu > 0.0 {
                self.pixels_per_unit = ppu as f32;
            }
        }

        info!(
            "Loaded config: validate_entries={}, main_texture_slot={}, pixels_per_unit={}",
            self.validate_entries, self.main_texture_slot, self.pixels_per_unit
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set(
            "overrides",
            "validate_entries",
            Some(self.validate_entries.to_string()),
        );
        config.set(
            "overrides",
            "main_texture_slot",
            Some(self.main_texture_slot.clone()),
        );
        config.set(
            "sprites",
            "pixels_per_unit",
            Some(self.pixels_per_unit.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
