//! Axis-aligned rectangle geometry for every play-field entity
//!
//! A rectangle is stored as its top-left corner plus size, in logical
//! playfield pixels (y grows downward):
//! - left/right/top/bottom edges
//! - center accessors that move the rectangle while keeping its size

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn set_center_x(&mut self, cx: f32) {
        self.x = cx - self.w / 2.0;
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    /// Translate by a velocity vector
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Strict overlap test: rectangles that only share an edge do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Resize horizontally around the current center
    pub fn resize_width_centered(&mut self, width: f32) {
        let center = self.center();
        self.w = width;
        self.set_center(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Vec2::new(60.0, 40.0));
    }

    #[test]
    fn test_overlap_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
        assert!(overlapping.overlaps(&a));
    }

    #[test]
    fn test_resize_keeps_center() {
        let mut r = Rect::new(350.0, 550.0, 100.0, 20.0);
        let before = r.center();
        r.resize_width_centered(140.0);
        assert_eq!(r.center(), before);
        assert_eq!(r.w, 140.0);
    }

    #[test]
    fn test_setters() {
        let mut r = Rect::new(0.0, 0.0, 15.0, 15.0);
        r.set_center_x(400.0);
        r.set_bottom(545.0);
        assert_eq!(r.center_x(), 400.0);
        assert_eq!(r.bottom(), 545.0);
        r.set_right(800.0);
        assert_eq!(r.left(), 785.0);
    }
}
