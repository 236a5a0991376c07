//! Game settings
//!
//! Persisted in LocalStorage as JSON. Missing fields fall back to defaults so
//! older saves keep loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::PlayBounds;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Distance per tick at full throttle
    pub move_speed: f32,
    /// Milliseconds between falling shapes
    pub spawn_interval_ms: u32,
    /// Live shape cap (`null` = unlimited)
    pub max_live_shapes: Option<usize>,
    /// Shapes below this height are removed
    pub floor_y: f32,
    /// Shapes beyond this |x| or |z| are removed
    pub play_half_extent: f32,
    /// Fixed RNG seed (otherwise seeded from the clock)
    pub seed: Option<u64>,
    /// Show the position/shape-count HUD
    pub show_hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            max_live_shapes: Some(MAX_LIVE_SHAPES),
            floor_y: FLOOR_Y,
            play_half_extent: PLAY_HALF_EXTENT,
            seed: None,
            show_hud: true,
        }
    }
}

impl Settings {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.move_speed.is_finite() || self.move_speed < 0.0 {
            return Err(invalid("move_speed", format!("{} is not a usable speed", self.move_speed)));
        }
        if self.spawn_interval_ms == 0 {
            return Err(invalid("spawn_interval_ms", "must be at least 1".into()));
        }
        if self.max_live_shapes == Some(0) {
            return Err(invalid("max_live_shapes", "use null for no cap, not 0".into()));
        }
        if !self.floor_y.is_finite() {
            return Err(invalid("floor_y", "must be finite".into()));
        }
        if !self.play_half_extent.is_finite() || self.play_half_extent <= 0.0 {
            return Err(invalid("play_half_extent", "must be positive".into()));
        }
        Ok(())
    }

    /// Culling region for shapes
    pub fn bounds(&self) -> PlayBounds {
        PlayBounds {
            floor_y: self.floor_y,
            half_extent: self.play_half_extent,
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "drive_dodge_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Settings not saved: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn invalid(field: &'static str, reason: String) -> SettingsError {
    SettingsError::Invalid { field, reason }
}
