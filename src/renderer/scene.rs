//! Scene building: session state to draw calls
//!
//! Nothing here mutates the session; a frame is drawn from one consistent
//! borrow taken between updates.

use glam::Vec2;

use super::canvas::{Canvas, Stroke};
use crate::Color;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::{GamePhase, GameSession, MenuRow, Rect};

/// Rough glyph width used to center text
const CHAR_WIDTH: f32 = 10.0;
const LINE_HEIGHT: f32 = 30.0;
const OVERLAY_ALPHA: u8 = 180;

/// Draw one complete frame (does not present it)
pub fn draw_frame<C: Canvas>(canvas: &mut C, session: &GameSession, fps: Option<u32>) {
    canvas.fill(Color::BLACK);

    if session.phase == GamePhase::Menu {
        draw_menu(canvas, session);
        return;
    }

    draw_paddle(canvas, session);
    draw_ball(canvas, session);
    draw_bricks(canvas, session);
    draw_power_ups(canvas, session);
    draw_particles(canvas, session);
    draw_hud(canvas, session, fps);

    if session.ball.sticky && session.phase == GamePhase::Playing {
        text_centered(
            canvas,
            SCREEN_HEIGHT - 30.0,
            "Press SPACE or click to launch the ball",
            Color::YELLOW,
        );
    }

    if session.phase == GamePhase::GameOver {
        draw_game_over(canvas, session);
    }
}

fn draw_paddle<C: Canvas>(canvas: &mut C, session: &GameSession) {
    let paddle = &session.paddle;
    canvas.rect(paddle.rect, paddle.color, Stroke::Fill);
    canvas.rect(paddle.rect, Color::WHITE, Stroke::Outline);
}

fn draw_ball<C: Canvas>(canvas: &mut C, session: &GameSession) {
    let ball = &session.ball;
    if !ball.active {
        return;
    }
    canvas.ellipse(ball.rect, ball.draw_color(), Stroke::Fill);
    canvas.ellipse(ball.rect, Color::WHITE, Stroke::Outline);
}

fn draw_bricks<C: Canvas>(canvas: &mut C, session: &GameSession) {
    for brick in session.bricks.iter().filter(|b| !b.is_destroyed()) {
        let r = brick.rect;
        canvas.rect(r, brick.color, Stroke::Fill);

        // Cracks on damaged bricks
        if brick.is_damaged() {
            let crack = brick.crack_color();
            canvas.line(
                Vec2::new(r.left(), r.top()),
                Vec2::new(r.right(), r.bottom()),
                crack,
            );
            canvas.line(
                Vec2::new(r.right(), r.top()),
                Vec2::new(r.left(), r.bottom()),
                crack,
            );
        }

        canvas.rect(r, Color::WHITE, Stroke::Outline);
    }
}

fn draw_power_ups<C: Canvas>(canvas: &mut C, session: &GameSession) {
    for power_up in session.power_ups.iter().filter(|p| p.active) {
        canvas.rect(power_up.rect, power_up.kind.color(), Stroke::Fill);
        canvas.rect(power_up.rect, Color::WHITE, Stroke::Outline);

        let symbol = power_up.kind.symbol();
        let center = power_up.rect.center();
        canvas.text(
            Vec2::new(center.x - CHAR_WIDTH / 2.0, center.y - CHAR_WIDTH / 2.0),
            symbol,
            Color::WHITE,
        );
    }
}

fn draw_particles<C: Canvas>(canvas: &mut C, session: &GameSession) {
    for particle in session.particles.iter().filter(|p| p.life > 0) {
        let size = particle.size;
        let rect = Rect::new(
            particle.pos.x - size,
            particle.pos.y - size,
            size * 2.0,
            size * 2.0,
        );
        canvas.ellipse(rect, particle.color.with_alpha(particle.alpha()), Stroke::Fill);
    }
}

fn draw_hud<C: Canvas>(canvas: &mut C, session: &GameSession, fps: Option<u32>) {
    let hud = session.hud();
    canvas.text(Vec2::new(10.0, 10.0), &format!("Score: {}", hud.score), Color::WHITE);
    canvas.text(
        Vec2::new(SCREEN_WIDTH / 2.0 - 60.0, 10.0),
        &format!("Level: {}", hud.level),
        Color::WHITE,
    );
    canvas.text(
        Vec2::new(SCREEN_WIDTH - 150.0, 10.0),
        &format!("Lives: {}", hud.lives),
        Color::WHITE,
    );

    if let Some(effect) = hud.speed_effect {
        canvas.text(
            Vec2::new(10.0, 30.0),
            &format!("{:?} {}", effect.kind, effect.remaining),
            Color::ORANGE,
        );
    }
    if let Some(fps) = fps {
        canvas.text(
            Vec2::new(SCREEN_WIDTH - 150.0, 30.0),
            &format!("FPS: {fps}"),
            Color::rgb(128, 128, 128),
        );
    }
}

fn draw_game_over<C: Canvas>(canvas: &mut C, session: &GameSession) {
    canvas.rect(
        Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
        Color::BLACK.with_alpha(OVERLAY_ALPHA),
        Stroke::Fill,
    );

    let mid = SCREEN_HEIGHT / 2.0;
    text_centered(canvas, mid - 50.0, "GAME OVER", Color::RED);
    text_centered(
        canvas,
        mid,
        &format!("Final score: {}", session.paddle.score),
        Color::WHITE,
    );
    text_centered(canvas, mid + 50.0, "Press R to restart", Color::YELLOW);
}

fn draw_menu<C: Canvas>(canvas: &mut C, session: &GameSession) {
    let config = &session.config;
    let menu = &session.menu;
    let mut y = SCREEN_HEIGHT / 2.0 - 3.0 * LINE_HEIGHT;

    text_centered(canvas, y, "BRICKFALL", Color::ORANGE);
    y += 2.0 * LINE_HEIGHT;

    for row in MenuRow::ALL {
        let label = match row {
            MenuRow::Difficulty => format!("Difficulty: < {} >", menu.difficulty(config)),
            MenuRow::SpeedLevel => format!("Ball speed: < {} >", menu.speed_level(config)),
            MenuRow::Start if menu.game_in_progress => "Start new game".to_string(),
            MenuRow::Start => "Start".to_string(),
        };
        let (label, color) = if row == menu.row {
            (format!("> {label}"), Color::YELLOW)
        } else {
            (label, Color::WHITE)
        };
        text_centered(canvas, y, &label, color);
        y += LINE_HEIGHT;
    }

    y += LINE_HEIGHT;
    let hint = if menu.game_in_progress {
        "Arrows: choose   Enter: start   Esc: resume   Q: quit"
    } else {
        "Arrows: choose   Enter: start   Q: quit"
    };
    text_centered(canvas, y, hint, Color::rgb(128, 128, 128));
}

fn text_centered<C: Canvas>(canvas: &mut C, y: f32, text: &str, color: Color) {
    let width = text.chars().count() as f32 * CHAR_WIDTH;
    canvas.text(Vec2::new(SCREEN_WIDTH / 2.0 - width / 2.0, y), text, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::renderer::canvas::{DrawCommand, RecordingCanvas};
    use crate::sim::PowerUpKind;

    fn session() -> GameSession {
        GameSession::new(GameConfig::standard(), "normal", "medium", 3)
    }

    #[test]
    fn test_playing_frame_contents() {
        let session = session();
        let mut canvas = RecordingCanvas::new();
        draw_frame(&mut canvas, &session, None);

        assert_eq!(canvas.commands[0], DrawCommand::Fill(Color::BLACK));
        let brick_fills = canvas
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect(r, _, Stroke::Fill) if r.w == 75.0))
            .count();
        assert_eq!(brick_fills, 60);
        assert!(canvas.texts().any(|t| t == "Lives: 3"));
        assert!(canvas.texts().any(|t| t.contains("launch")));
    }

    #[test]
    fn test_damaged_brick_gets_cracks() {
        let mut session = session();
        session.bricks.truncate(1);
        session.bricks[0].max_health = 2;
        let mut canvas = RecordingCanvas::new();
        draw_frame(&mut canvas, &session, None);

        let cracks = canvas
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line(..)))
            .count();
        assert_eq!(cracks, 2);
    }

    #[test]
    fn test_power_ball_drawn_yellow() {
        let mut session = session();
        session.ball.power_ball = true;
        let mut canvas = RecordingCanvas::new();
        draw_frame(&mut canvas, &session, None);
        assert!(canvas.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Ellipse(_, color, Stroke::Fill) if *color == Color::YELLOW
        )));
    }

    #[test]
    fn test_power_up_symbol() {
        let mut session = session();
        session
            .power_ups
            .push(crate::sim::PowerUp::new(100.0, 300.0, PowerUpKind::Life));
        let mut canvas = RecordingCanvas::new();
        draw_frame(&mut canvas, &session, None);
        assert!(canvas.texts().any(|t| t == "♥"));
    }

    #[test]
    fn test_game_over_overlay() {
        let mut session = session();
        session.phase = GamePhase::GameOver;
        let mut canvas = RecordingCanvas::new();
        draw_frame(&mut canvas, &session, Some(60));
        assert!(canvas.texts().any(|t| t == "GAME OVER"));
        assert!(canvas.texts().any(|t| t == "FPS: 60"));
        assert!(!canvas.texts().any(|t| t.contains("launch")));
    }

    #[test]
    fn test_menu_frame() {
        let mut session = session();
        session.open_menu();
        let mut canvas = RecordingCanvas::new();
        draw_frame(&mut canvas, &session, None);
        assert!(canvas.texts().any(|t| t == "Difficulty: < normal >"));
        assert!(canvas.texts().any(|t| t == "> Start new game"));
        assert!(!canvas.texts().any(|t| t.starts_with("Score")));
    }
}
