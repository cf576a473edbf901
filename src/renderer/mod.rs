//! Rendering module
//!
//! `scene` turns a session into primitive draw calls on a `Canvas`;
//! `terminal` is the interactive backend.

pub mod canvas;
pub mod scene;
pub mod terminal;

pub use canvas::{Canvas, DrawCommand, RecordingCanvas, Stroke};
pub use scene::draw_frame;
pub use terminal::TerminalCanvas;
