//! Ball speed control
//!
//! A [`SpeedController`] keeps the bookkeeping for one ball's speed: a base
//! speed, a clamped multiplier and absolute speed bounds. It never stores the
//! velocity itself; every operation rewrites the velocity it is handed while
//! preserving the sign of each axis and the x/y ratio.
//!
//! "Total speed" throughout is the mean of the absolute axis speeds,
//! `(|vx| + |vy|) / 2`, not the Euclidean length.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{DifficultyPreset, GameConfig};

/// Base speed of a freshly built controller
pub const DEFAULT_BASE_SPEED: f32 = 6.0;
pub const MIN_SPEED: f32 = 3.0;
pub const MAX_SPEED: f32 = 12.0;
pub const MIN_MULTIPLIER: f32 = 0.5;
pub const MAX_MULTIPLIER: f32 = 2.0;
pub const DEFAULT_INCREASE_FACTOR: f32 = 1.1;
pub const DEFAULT_DECREASE_FACTOR: f32 = 0.9;
/// Multiplier gained per level above the first
pub const LEVEL_RAMP_PER_LEVEL: f32 = 0.1;
/// Per-axis share of the magnitude when the ball has no direction yet
const ZERO_SPEED_SPLIT: f32 = 0.7;
/// Lifetime of a timed speed effect in frames
pub const DEFAULT_EFFECT_DURATION: u32 = 300;

/// Mean of the absolute axis speeds
#[inline]
pub fn total_speed(vel: Vec2) -> f32 {
    (vel.x.abs() + vel.y.abs()) / 2.0
}

#[inline]
fn direction(component: f32) -> f32 {
    if component >= 0.0 { 1.0 } else { -1.0 }
}

/// Snapshot of a ball's speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedInfo {
    pub horizontal: f32,
    pub vertical: f32,
    pub total: f32,
    pub multiplier: f32,
}

/// Temporary speed modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedEffectKind {
    Boost,
    SlowDown,
}

impl SpeedEffectKind {
    /// Multiplier factor applied when the effect starts
    pub fn factor(&self) -> f32 {
        match self {
            SpeedEffectKind::Boost => 1.3,
            SpeedEffectKind::SlowDown => 0.7,
        }
    }
}

/// A running timed speed effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSpeedEffect {
    pub kind: SpeedEffectKind,
    /// Frames left
    pub remaining: u32,
}

impl ActiveSpeedEffect {
    /// Count down one frame. Returns true while the effect is still running.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }
}

/// Per-ball speed bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedController {
    pub base_speed: f32,
    pub current_speed_multiplier: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for SpeedController {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_SPEED)
    }
}

impl SpeedController {
    pub fn new(base_speed: f32) -> Self {
        Self {
            base_speed,
            current_speed_multiplier: 1.0,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
        }
    }

    /// Select a named speed level (falls back to the base speed when unknown)
    pub fn set_absolute_speed(&self, vel: &mut Vec2, level: &str, config: &GameConfig) {
        let speed = config.ball_speed(level).unwrap_or(self.base_speed);
        self.apply_speed(vel, speed);
    }

    /// Use the ball speed of a difficulty preset
    pub fn set_difficulty_speed(&self, vel: &mut Vec2, preset: &DifficultyPreset) {
        self.apply_speed(vel, preset.ball_speed);
    }

    pub fn increase_speed(&mut self, vel: &mut Vec2, factor: f32) {
        self.current_speed_multiplier *= factor;
        self.apply_relative_speed(vel);
    }

    pub fn decrease_speed(&mut self, vel: &mut Vec2, factor: f32) {
        self.current_speed_multiplier *= factor;
        self.apply_relative_speed(vel);
    }

    /// Multiplier back to 1.0 and the ball back to its base speed
    pub fn reset_speed(&mut self, vel: &mut Vec2) {
        self.current_speed_multiplier = 1.0;
        self.apply_speed(vel, self.base_speed);
    }

    /// Set the multiplier for a level (+10% per level above 1) and apply it
    pub fn apply_level_ramp(&mut self, vel: &mut Vec2, level: u32) {
        self.current_speed_multiplier =
            1.0 + level.saturating_sub(1) as f32 * LEVEL_RAMP_PER_LEVEL;
        self.apply_relative_speed(vel);
    }

    /// Start a timed effect
    pub fn apply_effect(
        &mut self,
        vel: &mut Vec2,
        kind: SpeedEffectKind,
        duration: u32,
    ) -> ActiveSpeedEffect {
        match kind {
            SpeedEffectKind::Boost => self.increase_speed(vel, kind.factor()),
            SpeedEffectKind::SlowDown => self.decrease_speed(vel, kind.factor()),
        }
        log::debug!(
            "Speed effect {:?} for {} frames (multiplier {:.2})",
            kind,
            duration,
            self.current_speed_multiplier
        );
        ActiveSpeedEffect {
            kind,
            remaining: duration,
        }
    }

    pub fn speed_info(&self, vel: Vec2) -> SpeedInfo {
        SpeedInfo {
            horizontal: vel.x.abs(),
            vertical: vel.y.abs(),
            total: total_speed(vel),
            multiplier: self.current_speed_multiplier,
        }
    }

    /// Apply an absolute speed, keeping direction and axis ratio
    fn apply_speed(&self, vel: &mut Vec2, speed: f32) {
        let new_speed = speed.clamp(self.min_speed, self.max_speed);
        let dir = Vec2::new(direction(vel.x), direction(vel.y));

        let current = total_speed(*vel);
        if current > 0.0 {
            let ratio = vel.abs() / current;
            *vel = dir * new_speed * ratio;
        } else {
            *vel = dir * new_speed * ZERO_SPEED_SPLIT;
        }
    }

    /// Re-derive the base from the current speed and the (already updated)
    /// multiplier, then reapply `base * multiplier` within the speed bounds.
    fn apply_relative_speed(&mut self, vel: &mut Vec2) {
        self.current_speed_multiplier = self
            .current_speed_multiplier
            .clamp(MIN_MULTIPLIER, MAX_MULTIPLIER);

        let current_total = total_speed(*vel);
        let base = current_total / self.current_speed_multiplier;
        let new_speed =
            (base * self.current_speed_multiplier).clamp(self.min_speed, self.max_speed);

        let dir = Vec2::new(direction(vel.x), direction(vel.y));
        if current_total > 0.0 {
            let ratio = vel.abs() / current_total;
            *vel = dir * new_speed * ratio;
        }
    }
}
