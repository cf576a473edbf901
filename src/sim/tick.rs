//! Per-frame simulation step
//!
//! Core game loop that advances the session one frame.

use super::collision::first_overlap;
use super::menu::MenuAction;
use super::speed::{DEFAULT_EFFECT_DURATION, SpeedEffectKind};
use super::state::{Brick, GamePhase, GameSession, PowerUp};
use crate::Color;
use crate::consts::*;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move-left key held
    pub left: bool,
    /// Move-right key held
    pub right: bool,
    /// Launch ball (space/click)
    pub launch: bool,
    /// Restart after game over
    pub restart: bool,
    /// Escape: open the menu while playing, resume from the menu
    pub menu: bool,
    /// Menu navigation (only read in the menu)
    pub menu_action: Option<MenuAction>,
    /// Debug speed keys
    pub speed_effect: Option<SpeedEffectKind>,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Color and base health of each brick row, top to bottom
const ROW_STYLES: [(Color, i32); BRICK_ROWS] = [
    (Color::RED, 1),
    (Color::ORANGE, 1),
    (Color::YELLOW, 1),
    (Color::GREEN, 2),
    (Color::BLUE, 2),
    (Color::PURPLE, 3),
];

/// Advance the session by one frame
pub fn tick(session: &mut GameSession, input: &TickInput) {
    match session.phase {
        GamePhase::Menu => {
            if input.menu {
                session.resume_from_menu();
                return;
            }
            if let Some(action) = input.menu_action {
                let config = session.config;
                if session.menu.apply(action, &config) {
                    session.start_from_menu();
                }
            }
            return;
        }
        GamePhase::GameOver => {
            if input.restart {
                session.reset_game();
            } else if input.menu {
                session.open_menu();
            }
            return;
        }
        GamePhase::Playing => {}
    }

    if input.menu {
        session.open_menu();
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(session, &mut input);
    }
    let input = &input;

    if input.launch {
        session.ball.launch();
    }
    if let Some(kind) = input.speed_effect {
        session.start_speed_effect(kind, DEFAULT_EFFECT_DURATION);
    }

    session.frame += 1;

    // Paddle
    if input.left {
        session.paddle.move_by(-1.0);
    }
    if input.right {
        session.paddle.move_by(1.0);
    }

    // Ball
    if session.ball.sticky {
        session.ball.anchor_to(&session.paddle);
    }
    session.ball.advance();
    session.ball.check_collision(&session.paddle);

    collide_bricks(session);
    update_power_ups(session);

    session.particles.retain_mut(|p| p.update());

    session.tick_speed_effect();
    session.ball.apply_level_ramp(session.level);

    if session.bricks.is_empty() {
        session.level += 1;
        log::info!("Level cleared, advancing to level {}", session.level);
        session.serve_ball();
        session.create_level();
    }

    if !session.ball.active {
        session.paddle.lives = session.paddle.lives.saturating_sub(1);
        if session.paddle.lives == 0 {
            session.phase = GamePhase::GameOver;
            log::info!(
                "Game over: score={} level={}",
                session.paddle.score,
                session.level
            );
        } else {
            log::debug!("Ball lost, {} lives left", session.paddle.lives);
            session.serve_ball();
        }
    }
}

/// Hit at most one brick per frame: the first one the ball overlaps
fn collide_bricks(session: &mut GameSession) {
    if !session.ball.active {
        return;
    }
    let Some(idx) = first_overlap(&session.ball.rect, session.bricks.iter().map(|b| &b.rect))
    else {
        return;
    };

    let (destroyed, drop) = session.bricks[idx].hit(&mut session.rng);
    log::trace!("Brick {} hit (destroyed: {})", idx, destroyed);

    if destroyed {
        let brick = session.bricks.remove(idx);
        session.paddle.score += brick.score_value();

        let center = brick.rect.center();
        session.spawn_particles(center, brick.color, PARTICLES_BRICK);

        if let Some(kind) = drop {
            log::debug!("Power-up {:?} dropped", kind);
            session.power_ups.push(PowerUp::new(
                center.x - POWER_UP_SIZE / 2.0,
                center.y,
                kind,
            ));
        }
    }

    session.ball.vel.y = -session.ball.vel.y;
}

/// Move pickups; apply the ones the paddle catches
fn update_power_ups(session: &mut GameSession) {
    let mut caught = Vec::new();
    let paddle = &mut session.paddle;
    let ball = &mut session.ball;

    session.power_ups.retain_mut(|power_up| {
        power_up.advance();
        if !power_up.active {
            return false;
        }
        if power_up.rect.overlaps(&paddle.rect) {
            power_up.apply(paddle, ball);
            caught.push((power_up.rect.center(), power_up.kind));
            return false;
        }
        true
    });

    for (center, kind) in caught {
        log::debug!("Picked up {:?}", kind);
        session.spawn_particles(center, kind.color(), PARTICLES_PICKUP);
    }
}

/// Build the 6x10 brick grid for a level; every row gains one hit point per
/// level above the first
pub fn generate_level(level: u32) -> Vec<Brick> {
    let bonus = level.saturating_sub(1) as i32;
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLUMNS);

    for (row, (color, base_health)) in ROW_STYLES.iter().enumerate() {
        for col in 0..BRICK_COLUMNS {
            let x = col as f32 * BRICK_PITCH_X + BRICK_ORIGIN_X;
            let y = row as f32 * BRICK_PITCH_Y + BRICK_ORIGIN_Y;
            bricks.push(Brick::new(x, y, *color, base_health + bonus));
        }
    }
    bricks
}

/// Steer the paddle for demo mode: launch immediately, chase useful pickups
/// while the ball is climbing, otherwise track the ball
fn autopilot(session: &GameSession, input: &mut TickInput) {
    let ball = &session.ball;
    if ball.sticky {
        input.launch = true;
    }

    let ball_rising = ball.vel.y < 0.0 && ball.rect.center_y() < SCREEN_HEIGHT / 2.0;
    let pickup = session
        .power_ups
        .iter()
        .filter(|p| p.kind != super::state::PowerUpKind::Shrink)
        .max_by(|a, b| a.rect.y.total_cmp(&b.rect.y));

    let target = match pickup {
        Some(p) if ball_rising => p.rect.center_x(),
        // Aim slightly off-center so the bounce angle varies
        _ => ball.rect.center_x() + (session.frame % 60) as f32 * 0.5 - 15.0,
    };

    let paddle_x = session.paddle.rect.center_x();
    let deadzone = session.paddle.speed;
    input.left = target < paddle_x - deadzone;
    input.right = target > paddle_x + deadzone;
}

impl GameSession {
    /// Advance one frame (see [`tick`])
    pub fn update(&mut self, input: &TickInput) {
        tick(self, input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::PowerUpKind;
    use glam::Vec2;

    fn session() -> GameSession {
        GameSession::new(GameConfig::standard(), "normal", "medium", 12345)
    }

    #[test]
    fn test_generate_level_layout() {
        let bricks = generate_level(1);
        assert_eq!(bricks.len(), 60);
        assert_eq!(bricks[0].rect.x, 15.0);
        assert_eq!(bricks[0].rect.y, 50.0);
        assert_eq!(bricks[59].rect.x, 9.0 * 80.0 + 15.0);
        assert_eq!(bricks[59].rect.y, 5.0 * 40.0 + 50.0);
        assert_eq!(bricks[0].color, Color::RED);
        assert_eq!(bricks[30].health, 2);
        assert_eq!(bricks[59].health, 3);
        assert_eq!(bricks[59].color, Color::PURPLE);

        let level3 = generate_level(3);
        assert_eq!(level3[0].health, 3);
        assert_eq!(level3[59].max_health, 5);
    }

    #[test]
    fn test_sticky_ball_follows_paddle() {
        let mut s = session();
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut s, &input);
        assert!(s.ball.sticky);
        assert_eq!(s.ball.rect.center_x(), s.paddle.rect.center_x());
        assert_eq!(s.ball.rect.bottom(), s.paddle.rect.top() - BALL_PADDLE_GAP);
    }

    #[test]
    fn test_launch_frees_ball() {
        let mut s = session();
        let start = s.ball.rect;
        let input = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut s, &input);
        assert!(!s.ball.sticky);
        assert!(s.ball.rect.y < start.y);
    }

    #[test]
    fn test_single_brick_hit_per_frame() {
        let mut s = session();
        s.ball.launch();
        // Ball overlapping two bricks of the first row
        s.ball.rect.x = 85.0;
        s.ball.rect.y = 60.0;
        s.ball.vel = Vec2::new(0.0, -0.0001);
        let bricks_before = s.bricks.len();

        tick(&mut s, &TickInput::default());

        assert_eq!(s.bricks.len(), bricks_before - 1);
        assert_eq!(s.paddle.score, 10);
        assert_eq!(s.particles.len(), PARTICLES_BRICK);
        assert!(s.ball.vel.y > 0.0);
        // The first brick in scan order went, its neighbour survived
        assert!(s.bricks.iter().all(|b| b.rect.x != 15.0 || b.rect.y != 50.0));
        assert!(s.bricks.iter().any(|b| b.rect.x == 95.0 && b.rect.y == 50.0));
    }

    #[test]
    fn test_destroyed_brick_spawns_power_up_at_center() {
        let mut s = session();
        s.ball.launch();
        s.ball.rect.x = 40.0;
        s.ball.rect.y = 60.0;
        s.ball.vel = Vec2::new(0.0, -0.0001);
        s.bricks[0].power_up_chance = 1.0;
        let center = s.bricks[0].rect.center();
        // The brick roll is the first draw of the frame
        let expected = s.bricks[0].clone().hit(&mut s.rng.clone()).1;
        assert!(expected.is_some());

        tick(&mut s, &TickInput::default());

        assert_eq!(s.power_ups.len(), 1);
        let power_up = &s.power_ups[0];
        assert_eq!(Some(power_up.kind), expected);
        assert_eq!(power_up.rect.x, center.x - POWER_UP_SIZE / 2.0);
        // Spawned at the center, then fell for the rest of the frame
        assert_eq!(power_up.rect.y, center.y + POWER_UP_FALL_SPEED);
        assert!(power_up.active);
    }

    #[test]
    fn test_tough_brick_survives_but_ball_reflects() {
        let mut s = session();
        s.ball.launch();
        // Purple row (health 3)
        s.ball.rect.x = 30.0;
        s.ball.rect.y = 260.0;
        s.ball.vel = Vec2::new(0.0, -4.0);

        tick(&mut s, &TickInput::default());

        assert_eq!(s.bricks.len(), 60);
        assert_eq!(s.paddle.score, 0);
        let hit = s.bricks.iter().find(|b| b.is_damaged()).unwrap();
        assert_eq!(hit.health, 2);
        assert!(s.ball.vel.y > 0.0);
    }

    #[test]
    fn test_power_up_caught_by_paddle() {
        let mut s = session();
        let paddle = s.paddle.rect;
        s.power_ups.push(PowerUp::new(
            paddle.center_x() - 15.0,
            paddle.top() - 31.0,
            PowerUpKind::Life,
        ));

        tick(&mut s, &TickInput::default());

        assert!(s.power_ups.is_empty());
        assert_eq!(s.paddle.lives, 4);
        assert_eq!(s.particles.len(), PARTICLES_PICKUP);
        assert!(s.particles.iter().all(|p| p.color == Color::YELLOW));
    }

    #[test]
    fn test_power_up_missed_is_dropped() {
        let mut s = session();
        s.power_ups.push(PowerUp::new(10.0, SCREEN_HEIGHT - 1.0, PowerUpKind::Expand));
        tick(&mut s, &TickInput::default());
        tick(&mut s, &TickInput::default());
        assert!(s.power_ups.is_empty());
        assert_eq!(s.paddle.rect.w, PADDLE_WIDTH);
    }

    #[test]
    fn test_level_clear() {
        let mut s = session();
        s.ball.launch();
        s.bricks.truncate(1);
        s.bricks[0].health = 1;
        s.ball.rect = s.bricks[0].rect;
        s.ball.rect.w = BALL_SIZE;
        s.ball.rect.h = BALL_SIZE;
        s.ball.vel = Vec2::new(0.0, -0.0001);

        tick(&mut s, &TickInput::default());

        assert_eq!(s.level, 2);
        assert_eq!(s.bricks.len(), 60);
        assert_eq!(s.bricks[0].health, 2);
        assert_eq!(s.bricks[59].health, 4);
        assert!(s.ball.sticky);
        assert!(s.ball.active);
    }

    #[test]
    fn test_ball_lost_costs_a_life() {
        let mut s = session();
        s.ball.launch();
        s.ball.rect.y = SCREEN_HEIGHT + 1.0;
        s.ball.vel = Vec2::new(1.0, 5.0);

        tick(&mut s, &TickInput::default());

        assert_eq!(s.paddle.lives, 2);
        assert_eq!(s.phase, GamePhase::Playing);
        assert!(s.ball.sticky && s.ball.active);
    }

    #[test]
    fn test_game_over_freezes_until_restart() {
        let mut s = session();
        s.paddle.lives = 1;
        s.ball.launch();
        s.ball.rect.y = SCREEN_HEIGHT + 1.0;
        s.ball.vel = Vec2::new(1.0, 5.0);

        tick(&mut s, &TickInput::default());
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.paddle.lives, 0);

        let frame = s.frame;
        let ball = s.ball.rect;
        let input = TickInput {
            left: true,
            launch: true,
            ..Default::default()
        };
        tick(&mut s, &input);
        assert_eq!(s.frame, frame);
        assert_eq!(s.ball.rect, ball);
        assert_eq!(s.phase, GamePhase::GameOver);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut s, &restart);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.paddle.lives, 3);
        assert_eq!(s.level, 1);
        assert_eq!(s.paddle.score, 0);
    }

    #[test]
    fn test_menu_pauses_and_resumes() {
        let mut s = session();
        let esc = TickInput {
            menu: true,
            ..Default::default()
        };
        tick(&mut s, &esc);
        assert_eq!(s.phase, GamePhase::Menu);

        let frame = s.frame;
        tick(&mut s, &TickInput::default());
        assert_eq!(s.frame, frame);

        tick(&mut s, &esc);
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_menu_starts_new_game_with_selection() {
        let mut s = session();
        s.paddle.score = 500;
        s.open_menu();

        let nav = |action| TickInput {
            menu_action: Some(action),
            ..Default::default()
        };
        // Start -> Difficulty, then normal -> hard
        tick(&mut s, &nav(MenuAction::Down));
        tick(&mut s, &nav(MenuAction::Right));
        tick(&mut s, &nav(MenuAction::Confirm));

        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.difficulty, "hard");
        assert_eq!(s.paddle.lives, 2);
        assert_eq!(s.paddle.score, 0);
        assert_eq!(s.paddle.speed, 9.0);
    }

    #[test]
    fn test_level_ramp_applied_every_frame() {
        let mut s = session();
        s.level = 3;
        tick(&mut s, &TickInput::default());
        assert!((s.ball.speed.current_speed_multiplier - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_debug_speed_key_starts_effect() {
        let mut s = session();
        let input = TickInput {
            speed_effect: Some(SpeedEffectKind::SlowDown),
            ..Default::default()
        };
        tick(&mut s, &input);
        let effect = s.speed_effect.unwrap();
        assert_eq!(effect.kind, SpeedEffectKind::SlowDown);
        assert_eq!(effect.remaining, DEFAULT_EFFECT_DURATION - 1);
    }

    #[test]
    fn test_determinism() {
        let mut s1 = GameSession::new(GameConfig::standard(), "hard", "fast", 99999);
        let mut s2 = GameSession::new(GameConfig::standard(), "hard", "fast", 99999);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut s1, &input);
            tick(&mut s2, &input);
        }

        assert_eq!(s1.frame, s2.frame);
        assert_eq!(s1.paddle.score, s2.paddle.score);
        assert_eq!(s1.bricks.len(), s2.bricks.len());
        assert_eq!(s1.ball.rect, s2.ball.rect);
        assert_eq!(s1.particles.len(), s2.particles.len());
    }

    #[test]
    fn test_autopilot_launches_and_scores() {
        let mut s = session();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut s, &input);
        assert!(!s.ball.sticky);

        for _ in 0..3000 {
            tick(&mut s, &input);
        }
        assert!(s.paddle.score > 0);
    }
}
