//! Game settings and preferences
//!
//! Stored as a JSON file next to the player; every field has a default so a
//! partial file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, DEFAULT_DIFFICULTY, DEFAULT_SPEED_LEVEL, GameConfig};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preset name
    pub difficulty: String,
    /// Ball speed level name
    pub speed_level: String,
    /// RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,

    // === Visual Effects ===
    /// Particle effects (brick explosions, pickup sparks)
    pub particles: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Open the menu before the first game
    pub start_in_menu: bool,

    /// Write logs to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            speed_level: DEFAULT_SPEED_LEVEL.to_string(),
            seed: None,

            particles: true,

            show_fps: false,
            start_in_menu: true,

            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, or defaults when the file does not exist yet
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("Using default settings");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject preset names the config does not know
    pub fn validate(&self, config: &GameConfig) -> Result<(), ConfigError> {
        config.validate_difficulty(&self.difficulty)?;
        config.validate_speed_level(&self.speed_level)?;
        Ok(())
    }
}
