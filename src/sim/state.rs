//! Game entities and session state
//!
//! Everything the per-frame update touches lives here. The session owns every
//! entity; entities never refer back to it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{paddle_bounce_angle, paddle_bounce_velocity, wall_contacts};
use super::menu::MenuState;
use super::rect::Rect;
use super::speed::{ActiveSpeedEffect, SpeedController, SpeedEffectKind, SpeedInfo};
use crate::Color;
use crate::config::{DifficultyPreset, GameConfig};
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Choosing difficulty and ball speed
    Menu,
    /// Active gameplay
    Playing,
    /// Out of lives, waiting for a restart
    GameOver,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Horizontal speed in px/frame
    pub speed: f32,
    pub lives: u32,
    pub score: u32,
    pub color: Color,
}

impl Paddle {
    pub fn new(x: f32, y: f32, speed: f32, lives: u32) -> Self {
        Self {
            rect: Rect::new(x, y, PADDLE_WIDTH, PADDLE_HEIGHT),
            speed,
            lives,
            score: 0,
            color: Color::GREEN,
        }
    }

    /// Paddle centered near the bottom of the screen
    pub fn centered(speed: f32, lives: u32) -> Self {
        Self::new(
            SCREEN_WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
            SCREEN_HEIGHT - PADDLE_BOTTOM_OFFSET,
            speed,
            lives,
        )
    }

    /// Move by `direction * speed` (direction is -1, 0 or 1), kept on screen
    pub fn move_by(&mut self, direction: f32) {
        self.rect.x += direction * self.speed;

        if self.rect.left() < 0.0 {
            self.rect.set_left(0.0);
        }
        if self.rect.right() > SCREEN_WIDTH {
            self.rect.set_right(SCREEN_WIDTH);
        }
    }

    pub fn grow(&mut self) {
        if self.rect.w < PADDLE_MAX_WIDTH {
            let width = (self.rect.w + PADDLE_RESIZE_STEP).min(PADDLE_MAX_WIDTH);
            self.rect.resize_width_centered(width);
        }
    }

    pub fn shrink(&mut self) {
        if self.rect.w > PADDLE_MIN_WIDTH {
            let width = (self.rect.w - PADDLE_RESIZE_STEP).max(PADDLE_MIN_WIDTH);
            self.rect.resize_width_centered(width);
        }
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub rect: Rect,
    pub vel: Vec2,
    pub color: Color,
    /// In play (false once it falls out of the bottom)
    pub active: bool,
    /// Glued to the paddle, waiting for launch
    pub sticky: bool,
    /// Cosmetic status granted by the power-ball pickup
    pub power_ball: bool,
    pub speed: SpeedController,
}

impl Ball {
    pub fn new(x: f32, y: f32, base_speed: f32, rng: &mut impl Rng) -> Self {
        Self {
            rect: Rect::new(x, y, BALL_SIZE, BALL_SIZE),
            vel: serve_velocity(rng),
            color: Color::WHITE,
            active: true,
            sticky: false,
            power_ball: false,
            speed: SpeedController::new(base_speed),
        }
    }

    /// Advance one frame of free flight, bouncing off the side and top walls
    pub fn advance(&mut self) {
        if !self.active || self.sticky {
            return;
        }
        self.rect.translate(self.vel);

        let contact = wall_contacts(&self.rect, SCREEN_WIDTH, SCREEN_HEIGHT);
        if contact.side {
            self.vel.x = -self.vel.x;
        }
        if contact.top {
            self.vel.y = -self.vel.y;
        }
        if contact.fell_out {
            self.active = false;
        }
    }

    /// Bounce off the paddle. Returns true if a bounce happened.
    pub fn check_collision(&mut self, paddle: &Paddle) -> bool {
        if self.active && !self.sticky && self.rect.overlaps(&paddle.rect) && self.vel.y > 0.0 {
            let angle = paddle_bounce_angle(&paddle.rect, &self.rect);
            self.vel = paddle_bounce_velocity(self.vel, angle);
            return true;
        }
        false
    }

    /// Put the ball back on the paddle with a fresh serve velocity
    pub fn reset(&mut self, paddle: &Paddle, rng: &mut impl Rng) {
        self.anchor_to(paddle);
        self.vel = serve_velocity(rng);
        self.active = true;
        self.sticky = true;
        self.power_ball = false;
        self.speed.reset_speed(&mut self.vel);
    }

    /// Re-position on top of the paddle without touching velocity
    pub fn anchor_to(&mut self, paddle: &Paddle) {
        self.rect.set_center_x(paddle.rect.center_x());
        self.rect.set_bottom(paddle.rect.top() - BALL_PADDLE_GAP);
    }

    pub fn launch(&mut self) {
        if self.sticky {
            self.sticky = false;
        }
    }

    /// Fill color (power balls are drawn yellow)
    pub fn draw_color(&self) -> Color {
        if self.power_ball { Color::YELLOW } else { self.color }
    }

    pub fn set_speed_level(&mut self, level: &str, config: &GameConfig) {
        self.speed.set_absolute_speed(&mut self.vel, level, config);
    }

    pub fn reset_speed(&mut self) {
        self.speed.reset_speed(&mut self.vel);
    }

    pub fn apply_level_ramp(&mut self, level: u32) {
        self.speed.apply_level_ramp(&mut self.vel, level);
    }

    pub fn apply_speed_effect(&mut self, kind: SpeedEffectKind, duration: u32) -> ActiveSpeedEffect {
        self.speed.apply_effect(&mut self.vel, kind, duration)
    }

    pub fn speed_info(&self) -> SpeedInfo {
        self.speed.speed_info(self.vel)
    }
}

/// `(±5, -5)` with a random horizontal sign
fn serve_velocity(rng: &mut impl Rng) -> Vec2 {
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    Vec2::new(sign * BALL_SERVE_SPEED, -BALL_SERVE_SPEED)
}

/// A destructible brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub color: Color,
    pub health: i32,
    pub max_health: i32,
    /// Probability of dropping a power-up when destroyed
    pub power_up_chance: f64,
}

impl Brick {
    pub fn new(x: f32, y: f32, color: Color, health: i32) -> Self {
        Self {
            rect: Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT),
            color,
            health,
            max_health: health,
            power_up_chance: BRICK_POWER_UP_CHANCE,
        }
    }

    /// Take one hit. Returns whether the brick is destroyed and the power-up
    /// it dropped, if any.
    pub fn hit(&mut self, rng: &mut impl Rng) -> (bool, Option<PowerUpKind>) {
        self.health -= 1;
        let destroyed = self.is_destroyed();

        let mut drop = None;
        if destroyed && rng.random::<f64>() < self.power_up_chance {
            drop = Some(PowerUpKind::random(rng));
        }
        (destroyed, drop)
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    pub fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }

    pub fn crack_color(&self) -> Color {
        self.color.darken(50)
    }

    /// Points awarded for destroying this brick
    pub fn score_value(&self) -> u32 {
        self.max_health.max(0) as u32 * BRICK_SCORE_PER_HEALTH
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Wider paddle
    Expand,
    /// Narrower paddle
    Shrink,
    /// One extra life
    Life,
    /// Marks the ball as a power ball
    PowerBall,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Expand,
        PowerUpKind::Shrink,
        PowerUpKind::Life,
        PowerUpKind::PowerBall,
    ];

    /// Uniform pick over all kinds
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::Expand => Color::GREEN,
            PowerUpKind::Shrink => Color::RED,
            PowerUpKind::Life => Color::YELLOW,
            PowerUpKind::PowerBall => Color::ORANGE,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PowerUpKind::Expand => "+",
            PowerUpKind::Shrink => "-",
            PowerUpKind::Life => "♥",
            PowerUpKind::PowerBall => "★",
        }
    }

    pub fn apply(&self, paddle: &mut Paddle, ball: &mut Ball) {
        match self {
            PowerUpKind::Expand => paddle.grow(),
            PowerUpKind::Shrink => paddle.shrink(),
            PowerUpKind::Life => paddle.lives += 1,
            PowerUpKind::PowerBall => ball.power_ball = true,
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub rect: Rect,
    pub kind: PowerUpKind,
    /// Fall speed in px/frame
    pub speed: f32,
    pub active: bool,
}

impl PowerUp {
    pub fn new(x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self {
            rect: Rect::new(x, y, POWER_UP_SIZE, POWER_UP_SIZE),
            kind,
            speed: POWER_UP_FALL_SPEED,
            active: true,
        }
    }

    /// Fall one frame; deactivate once below the screen
    pub fn advance(&mut self) {
        self.rect.y += self.speed;
        if self.rect.top() > SCREEN_HEIGHT {
            self.active = false;
        }
    }

    pub fn apply(&self, paddle: &mut Paddle, ball: &mut Ball) {
        self.kind.apply(paddle, ball);
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    /// Frames left
    pub life: u32,
}

impl Particle {
    pub fn new(pos: Vec2, color: Color, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            vel: Vec2::new(rng.random_range(-3.0..=3.0), rng.random_range(-3.0..=3.0)),
            color,
            size: rng.random_range(2..=5) as f32,
            life: rng.random_range(20..=40),
        }
    }

    /// Advance one frame. Returns false once the particle should be dropped.
    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
        self.size = (self.size - 0.1).max(0.0);
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0 && self.size > 0.0
    }

    /// Opacity fading with remaining life
    pub fn alpha(&self) -> u8 {
        (self.life * 6).min(255) as u8
    }
}

/// HUD snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub phase: GamePhase,
    pub speed: SpeedInfo,
    pub speed_effect: Option<ActiveSpeedEffect>,
}

/// One play-through: every entity plus the state machine around them
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: GameConfig,
    pub difficulty: String,
    pub speed_level: String,
    pub preset: DifficultyPreset,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub level: u32,
    pub phase: GamePhase,
    pub menu: MenuState,
    pub speed_effect: Option<ActiveSpeedEffect>,
    /// Frames simulated while playing
    pub frame: u64,
    /// When false no particles are spawned
    pub particles_enabled: bool,
}

impl GameSession {
    /// Start a game with the named presets. Unknown names fall back to the
    /// defaults; validate them at the boundary to report mistakes.
    pub fn new(config: GameConfig, difficulty: &str, speed_level: &str, seed: u64) -> Self {
        let preset = *config.difficulty_or_default(difficulty);
        let mut rng = Pcg32::seed_from_u64(seed);
        let paddle = Paddle::centered(preset.paddle_speed, preset.initial_lives);
        let ball = Ball::new(
            paddle.rect.center_x(),
            paddle.rect.top() - 10.0,
            preset.ball_speed,
            &mut rng,
        );

        let mut session = Self {
            config,
            difficulty: difficulty.to_string(),
            speed_level: speed_level.to_string(),
            preset,
            seed,
            rng,
            paddle,
            ball,
            bricks: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            level: 1,
            phase: GamePhase::Playing,
            menu: MenuState::new(&config, difficulty, speed_level),
            speed_effect: None,
            frame: 0,
            particles_enabled: true,
        };
        session.reset_game();
        session
    }

    /// Fresh game with the current difficulty and speed level
    pub fn reset_game(&mut self) {
        self.preset = *self.config.difficulty_or_default(&self.difficulty);
        self.paddle = Paddle::centered(self.preset.paddle_speed, self.preset.initial_lives);
        self.ball.speed = SpeedController::new(self.preset.ball_speed);
        self.serve_ball();

        self.power_ups.clear();
        self.particles.clear();
        self.speed_effect = None;
        self.level = 1;
        self.phase = GamePhase::Playing;
        self.menu.game_in_progress = false;
        self.create_level();

        log::info!(
            "New game: difficulty={} speed={} seed={}",
            self.difficulty,
            self.speed_level,
            self.seed
        );
    }

    /// Rebuild the brick grid for the current level
    pub fn create_level(&mut self) {
        self.bricks = super::tick::generate_level(self.level);
    }

    /// Glue the ball to the paddle with a fresh serve at the chosen speed level
    pub fn serve_ball(&mut self) {
        self.ball.reset(&self.paddle, &mut self.rng);
        self.ball.set_speed_level(&self.speed_level, &self.config);
    }

    pub fn spawn_particles(&mut self, pos: Vec2, color: Color, count: usize) {
        if !self.particles_enabled {
            return;
        }
        for _ in 0..count {
            let particle = Particle::new(pos, color, &mut self.rng);
            self.particles.push(particle);
        }
    }

    /// Start a timed speed effect, replacing any running one
    pub fn start_speed_effect(&mut self, kind: SpeedEffectKind, duration: u32) {
        self.speed_effect = Some(self.ball.apply_speed_effect(kind, duration));
    }

    /// Count the running speed effect down; restore the selected speed when
    /// it runs out
    pub fn tick_speed_effect(&mut self) {
        if let Some(effect) = self.speed_effect.as_mut() {
            if !effect.tick() {
                log::debug!("Speed effect {:?} expired", effect.kind);
                self.speed_effect = None;
                self.ball.reset_speed();
                self.ball.set_speed_level(&self.speed_level, &self.config);
            }
        }
    }

    /// Pause the current game and show the menu
    pub fn open_menu(&mut self) {
        self.menu.game_in_progress = self.phase == GamePhase::Playing;
        self.menu.row = super::menu::MenuRow::Start;
        self.phase = GamePhase::Menu;
        log::info!("Menu opened (game in progress: {})", self.menu.game_in_progress);
    }

    /// Leave the menu, resuming an interrupted game. Returns false when there
    /// is nothing to resume.
    pub fn resume_from_menu(&mut self) -> bool {
        if self.phase == GamePhase::Menu && self.menu.game_in_progress {
            self.phase = GamePhase::Playing;
            self.menu.game_in_progress = false;
            return true;
        }
        false
    }

    /// Start a new game with the presets highlighted in the menu
    pub fn start_from_menu(&mut self) {
        self.difficulty = self.menu.difficulty(&self.config).to_string();
        self.speed_level = self.menu.speed_level(&self.config).to_string();
        self.reset_game();
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.paddle.score,
            lives: self.paddle.lives,
            level: self.level,
            phase: self.phase,
            speed: self.ball.speed_info(),
            speed_effect: self.speed_effect,
        }
    }
}
