//! Collision detection and response for axis-aligned rectangles
//!
//! No continuous detection: everything is a per-frame overlap test followed by
//! a velocity rewrite.

use glam::Vec2;

use super::rect::Rect;
use crate::consts::{MAX_BOUNCE_ANGLE, MAX_BOUNCE_SPEED_X, PADDLE_BOUNCE_SPEED};

/// Which screen edges a rectangle touches after a move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// Left or right wall touched
    pub side: bool,
    /// Top wall touched
    pub top: bool,
    /// Fully below the bottom of the screen
    pub fell_out: bool,
}

/// Check a rectangle against the walls of a `width` x `height` field.
/// There is no bottom wall; leaving through the bottom is reported instead.
pub fn wall_contacts(rect: &Rect, width: f32, height: f32) -> WallContact {
    WallContact {
        side: rect.left() <= 0.0 || rect.right() >= width,
        top: rect.top() <= 0.0,
        fell_out: rect.top() > height,
    }
}

/// Bounce angle for a ball hitting the paddle.
///
/// Zero at the paddle center, up to ±60° at the edges; a ball left of center
/// yields a positive angle.
pub fn paddle_bounce_angle(paddle: &Rect, ball: &Rect) -> f32 {
    let relative = paddle.center_x() - ball.center_x();
    let normalized = (relative / (paddle.w / 2.0)).clamp(-1.0, 1.0);
    normalized * MAX_BOUNCE_ANGLE
}

/// Velocity after a paddle bounce: always upward, horizontal speed from the
/// bounce angle, clamped.
pub fn paddle_bounce_velocity(vel: Vec2, angle: f32) -> Vec2 {
    let vx = (-angle.sin() * PADDLE_BOUNCE_SPEED).clamp(-MAX_BOUNCE_SPEED_X, MAX_BOUNCE_SPEED_X);
    Vec2::new(vx, -vel.y.abs())
}

/// Index of the first rectangle overlapping `rect`, in iteration order
pub fn first_overlap<'a, I>(rect: &Rect, others: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Rect>,
{
    others.into_iter().position(|other| rect.overlaps(other))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_contacts() {
        let inside = Rect::new(100.0, 100.0, 15.0, 15.0);
        assert_eq!(wall_contacts(&inside, 800.0, 600.0), WallContact::default());

        let left = Rect::new(-1.0, 100.0, 15.0, 15.0);
        assert!(wall_contacts(&left, 800.0, 600.0).side);

        let right = Rect::new(785.0, 100.0, 15.0, 15.0);
        assert!(wall_contacts(&right, 800.0, 600.0).side);

        let top = Rect::new(100.0, 0.0, 15.0, 15.0);
        assert!(wall_contacts(&top, 800.0, 600.0).top);

        let gone = Rect::new(100.0, 601.0, 15.0, 15.0);
        let contact = wall_contacts(&gone, 800.0, 600.0);
        assert!(contact.fell_out);
        assert!(!contact.top);
    }

    #[test]
    fn test_bounce_angle_center_and_edges() {
        let paddle = Rect::new(350.0, 550.0, 100.0, 20.0);

        let mut ball = Rect::new(0.0, 540.0, 15.0, 15.0);
        ball.set_center_x(400.0);
        assert_eq!(paddle_bounce_angle(&paddle, &ball), 0.0);

        ball.set_center_x(350.0);
        assert!((paddle_bounce_angle(&paddle, &ball) - MAX_BOUNCE_ANGLE).abs() < 1e-6);

        // Beyond the edge is clamped
        ball.set_center_x(460.0);
        assert!((paddle_bounce_angle(&paddle, &ball) + MAX_BOUNCE_ANGLE).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_velocity() {
        let v = paddle_bounce_velocity(Vec2::new(5.0, 5.0), 0.0);
        assert_eq!(v.x, 0.0);
        assert_eq!(v.y, -5.0);

        // Hitting left of center sends the ball left
        let v = paddle_bounce_velocity(Vec2::new(5.0, 5.0), MAX_BOUNCE_ANGLE);
        assert!(v.x < 0.0);
        assert!((v.x + MAX_BOUNCE_ANGLE.sin() * PADDLE_BOUNCE_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_first_overlap_picks_earliest() {
        let ball = Rect::new(100.0, 100.0, 15.0, 15.0);
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(90.0, 90.0, 20.0, 20.0),
            Rect::new(105.0, 105.0, 20.0, 20.0),
        ];
        assert_eq!(first_overlap(&ball, &rects), Some(1));
        assert_eq!(first_overlap(&ball, &rects[..1]), None);
    }
}
