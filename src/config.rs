//! Difficulty and ball-speed preset tables
//!
//! Presets are immutable static data. A [`GameConfig`] value wraps them and is
//! handed to the session constructor, so nothing in the simulation reads
//! process-wide mutable state.

use serde::Serialize;
use thiserror::Error;

/// Difficulty used when a lookup misses
pub const DEFAULT_DIFFICULTY: &str = "normal";
/// Ball speed level used when none is chosen
pub const DEFAULT_SPEED_LEVEL: &str = "medium";

/// Errors reported at the configuration boundary (CLI, settings file)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown difficulty '{name}' (expected one of: {expected})")]
    UnknownDifficulty { name: String, expected: String },

    #[error("unknown ball speed level '{name}' (expected one of: {expected})")]
    UnknownSpeedLevel { name: String, expected: String },

    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Numeric parameters of one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyPreset {
    /// Base ball speed (mean of absolute axis speeds, px/frame)
    pub ball_speed: f32,
    /// Paddle speed in px/frame
    pub paddle_speed: f32,
    /// Probability that a destroyed brick drops a power-up
    pub power_up_chance: f64,
    pub initial_lives: u32,
}

const DIFFICULTIES: &[(&str, DifficultyPreset)] = &[
    (
        "easy",
        DifficultyPreset {
            ball_speed: 5.0,
            paddle_speed: 7.0,
            power_up_chance: 0.3,
            initial_lives: 5,
        },
    ),
    (
        "normal",
        DifficultyPreset {
            ball_speed: 6.0,
            paddle_speed: 8.0,
            power_up_chance: 0.2,
            initial_lives: 3,
        },
    ),
    (
        "hard",
        DifficultyPreset {
            ball_speed: 7.0,
            paddle_speed: 9.0,
            power_up_chance: 0.1,
            initial_lives: 2,
        },
    ),
    (
        "expert",
        DifficultyPreset {
            ball_speed: 8.0,
            paddle_speed: 10.0,
            power_up_chance: 0.05,
            initial_lives: 1,
        },
    ),
];

const BALL_SPEEDS: &[(&str, f32)] = &[
    ("slow", 4.0),
    ("medium", 6.0),
    ("fast", 8.0),
    ("very_fast", 10.0),
];

/// Read-only provider of the preset tables
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    difficulties: &'static [(&'static str, DifficultyPreset)],
    ball_speeds: &'static [(&'static str, f32)],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl GameConfig {
    /// The built-in preset tables
    pub const fn standard() -> Self {
        Self {
            difficulties: DIFFICULTIES,
            ball_speeds: BALL_SPEEDS,
        }
    }

    /// Exact lookup of a difficulty preset
    pub fn difficulty(&self, name: &str) -> Option<&DifficultyPreset> {
        self.difficulties
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, preset)| preset)
    }

    /// Lookup falling back to the "normal" preset
    pub fn difficulty_or_default(&self, name: &str) -> &DifficultyPreset {
        self.difficulty(name)
            .or_else(|| self.difficulty(DEFAULT_DIFFICULTY))
            .unwrap_or(&self.difficulties[0].1)
    }

    /// Numeric speed of a named ball speed level
    pub fn ball_speed(&self, level: &str) -> Option<f32> {
        self.ball_speeds
            .iter()
            .find(|(n, _)| *n == level)
            .map(|(_, speed)| *speed)
    }

    /// Difficulty names in table order
    pub fn difficulty_names(&self) -> Vec<&'static str> {
        self.difficulties.iter().map(|(n, _)| *n).collect()
    }

    /// Speed level names in table order
    pub fn speed_level_names(&self) -> Vec<&'static str> {
        self.ball_speeds.iter().map(|(n, _)| *n).collect()
    }

    /// Check an externally supplied difficulty name
    pub fn validate_difficulty(&self, name: &str) -> Result<(), ConfigError> {
        match self.difficulty(name) {
            Some(_) => Ok(()),
            None => Err(ConfigError::UnknownDifficulty {
                name: name.to_string(),
                expected: self.difficulty_names().join(", "),
            }),
        }
    }

    /// Check an externally supplied speed level name
    pub fn validate_speed_level(&self, name: &str) -> Result<(), ConfigError> {
        match self.ball_speed(name) {
            Some(_) => Ok(()),
            None => Err(ConfigError::UnknownSpeedLevel {
                name: name.to_string(),
                expected: self.speed_level_names().join(", "),
            }),
        }
    }

    /// Preset tables as a JSON document (for `--list`)
    pub fn to_json(&self) -> serde_json::Value {
        let difficulties: serde_json::Map<String, serde_json::Value> = self
            .difficulties
            .iter()
            .map(|(n, p)| (n.to_string(), serde_json::json!(p)))
            .collect();
        let speeds: serde_json::Map<String, serde_json::Value> = self
            .ball_speeds
            .iter()
            .map(|(n, s)| (n.to_string(), serde_json::json!(s)))
            .collect();
        serde_json::json!({
            "difficulties": difficulties,
            "ball_speeds": speeds,
        })
    }
}
