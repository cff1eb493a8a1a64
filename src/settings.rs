//! Player settings and preferences
//!
//! Read as JSON from LocalStorage on wasm, or from the file named by
//! `FISSION_REACTOR_SETTINGS` on native. A bad or missing config never stops
//! the game, it falls back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    /// CSS scale applied to the 320x240 canvas
    pub scale: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when the page is hidden
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Slow the meltdown flicker down
    pub reduced_motion: bool,

    // === Debug ===
    /// Fixed seed for the meltdown flicker; OS entropy when unset
    pub flicker_seed: Option<u64>,
    /// Status line in the text overlay while playing
    pub show_status: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: 2.0,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            reduced_motion: false,

            flicker_seed: None,
            show_status: false,
        }
    }
}

impl Settings {
    /// Parse settings, clamping volumes and scale into range
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        if !settings.scale.is_finite() || settings.scale <= 0.0 {
            settings.scale = Self::default().scale;
        }
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "fission_reactor_settings";

    /// Env var naming the native settings file
    #[cfg(not(target_arch = "wasm32"))]
    pub const PATH_ENV: &'static str = "FISSION_REACTOR_SETTINGS";

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
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `FISSION_REACTOR_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(Self::PATH_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::read_file(std::path::Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.to_string_lossy());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {e}", path.to_string_lossy());
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_file(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.scale, 2.0);
        assert!(!s.reduced_motion);
        assert!(s.flicker_seed.is_none());
        assert!((s.effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{"reduced_motion": true, "flicker_seed": 42}"#).unwrap();
        assert!(s.reduced_motion);
        assert_eq!(s.flicker_seed, Some(42));
        assert_eq!(s.master_volume, 0.8);
        assert!(s.mute_on_blur);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let s = Settings::from_json(r#"{"master_volume": 3.0, "sfx_volume": -1.0, "scale": 0}"#)
            .unwrap();
        assert_eq!(s.master_volume, 1.0);
        assert_eq!(s.sfx_volume, 0.0);
        assert_eq!(s.scale, 2.0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_muted_silences() {
        let s = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(s.effective_volume(), 0.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let s = Settings {
            show_status: true,
            flicker_seed: Some(9),
            ..Default::default()
        };
        assert_eq!(Settings::from_json(&s.to_json().unwrap()).unwrap(), s);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::read_file(std::path::Path::new("/nonexistent/fission.json"));
        assert!(matches!(err, Err(SettingsError::Io(_))));
    }
}
