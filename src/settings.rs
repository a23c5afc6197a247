//! Game settings
//!
//! Loaded from a JSON file by the native driver. Missing fields fall back to
//! their defaults, so a partial file is fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    /// Playfield width in points
    pub screen_width: f32,
    /// Playfield height in points
    pub screen_height: f32,

    // === Simulation ===
    /// Gameplay RNG seed
    pub seed: u64,
    /// Background shooting stars
    pub starfield: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Portrait phone
            screen_width: 375.0,
            screen_height: 667.0,

            seed: 0x5eed,
            starfield: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject unusable screens; clamp volumes into range
    pub fn validate(&mut self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        for (name, volume) in [
            ("master_volume", &mut self.master_volume),
            ("sfx_volume", &mut self.sfx_volume),
        ] {
            let clamped = if volume.is_finite() {
                volume.clamp(0.0, 1.0)
            } else {
                0.0
            };
            if clamped != *volume {
                log::warn!("{} {} out of range, using {}", name, volume, clamped);
                *volume = clamped;
            }
        }

        Ok(())
    }

    pub fn screen_size(&self) -> (f32, f32) {
        (self.screen_width, self.screen_height)
    }
}
