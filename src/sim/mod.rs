//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed frame step per update
//! - Seeded RNG only
//! - Stable iteration order (bricks scan in grid order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod menu;
pub mod rect;
pub mod speed;
pub mod state;
pub mod tick;

pub use menu::{MenuAction, MenuRow, MenuState};
pub use rect::Rect;
pub use speed::{ActiveSpeedEffect, SpeedController, SpeedEffectKind, SpeedInfo};
pub use state::{
    Ball, Brick, GamePhase, GameSession, Hud, Paddle, Particle, PowerUp, PowerUpKind,
};
pub use tick::{TickInput, generate_level, tick};
