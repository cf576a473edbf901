//! Primitive drawing interface
//!
//! The scene builder decides what goes where in logical playfield pixels; a
//! backend decides how those primitives become pixels or terminal cells.

use glam::Vec2;

use crate::Color;
use crate::sim::Rect;

/// How a rectangle or ellipse is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Fill,
    Outline,
}

/// Drawing surface in logical playfield coordinates
pub trait Canvas {
    /// Clear the whole surface
    fn fill(&mut self, color: Color);
    fn rect(&mut self, rect: Rect, color: Color, stroke: Stroke);
    fn ellipse(&mut self, rect: Rect, color: Color, stroke: Stroke);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    /// Text with its top-left corner at `pos`
    fn text(&mut self, pos: Vec2, text: &str, color: Color);
    /// Show the finished frame
    fn present(&mut self) -> std::io::Result<()>;
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill(Color),
    Rect(Rect, Color, Stroke),
    Ellipse(Rect, Color, Stroke),
    Line(Vec2, Vec2, Color),
    Text(Vec2, String, Color),
}

/// Canvas that only records what it was asked to draw (headless runs, tests)
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    /// Commands of the frame being built
    pub commands: Vec<DrawCommand>,
    /// Number of frames presented so far
    pub frames: u64,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn in the current frame
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(_, text, _) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn fill(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Fill(color));
    }

    fn rect(&mut self, rect: Rect, color: Color, stroke: Stroke) {
        self.commands.push(DrawCommand::Rect(rect, color, stroke));
    }

    fn ellipse(&mut self, rect: Rect, color: Color, stroke: Stroke) {
        self.commands.push(DrawCommand::Ellipse(rect, color, stroke));
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line(from, to, color));
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text(pos, text.to_string(), color));
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.frames += 1;
        Ok(())
    }
}
