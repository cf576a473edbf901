//! Brickfall - a block-breaking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, speed control, collisions, session)
//! - `config`: Difficulty and speed-level preset tables
//! - `settings`: Player preferences loaded from JSON
//! - `renderer`: Draw-call interface, scene builder and terminal backend
//! - `platform`: Input polling and frame pacing

pub mod config;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, DifficultyPreset, GameConfig};
pub use settings::Settings;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Logical playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Target frame rate of the update loop
    pub const FPS: u32 = 60;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Distance from the paddle top to the bottom of the screen
    pub const PADDLE_BOTTOM_OFFSET: f32 = 50.0;
    pub const PADDLE_MIN_WIDTH: f32 = 50.0;
    pub const PADDLE_MAX_WIDTH: f32 = 150.0;
    pub const PADDLE_RESIZE_STEP: f32 = 10.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 15.0;
    /// Gap between a sticky ball and the paddle top
    pub const BALL_PADDLE_GAP: f32 = 5.0;
    pub const BALL_SERVE_SPEED: f32 = 5.0;
    /// Horizontal speed scale of a paddle bounce
    pub const PADDLE_BOUNCE_SPEED: f32 = 7.0;
    pub const MAX_BOUNCE_SPEED_X: f32 = 10.0;
    /// Maximum bounce angle (60 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Brick grid
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 30.0;
    pub const BRICK_ROWS: usize = 6;
    pub const BRICK_COLUMNS: usize = 10;
    pub const BRICK_PITCH_X: f32 = 80.0;
    pub const BRICK_PITCH_Y: f32 = 40.0;
    pub const BRICK_ORIGIN_X: f32 = 15.0;
    pub const BRICK_ORIGIN_Y: f32 = 50.0;
    pub const BRICK_SCORE_PER_HEALTH: u32 = 10;
    /// Chance a destroyed brick drops a power-up (same on every difficulty)
    pub const BRICK_POWER_UP_CHANCE: f64 = 0.2;

    /// Power-ups
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_FALL_SPEED: f32 = 3.0;

    /// Particle batch sizes
    pub const PARTICLES_BRICK: usize = 15;
    pub const PARTICLES_PICKUP: usize = 8;
}

/// An RGB color with an optional alpha channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Darken every channel by `amount`, saturating at zero
    pub fn darken(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_sub(amount),
            g: self.g.saturating_sub(amount),
            b: self.b.saturating_sub(amount),
            a: self.a,
        }
    }
}
