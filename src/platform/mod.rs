//! Platform abstraction layer
//!
//! Handles terminal specifics for:
//! - Input events (keyboard, mouse, resize)
//! - Frame timing

pub mod input;
pub mod time;

pub use input::InputMapper;
pub use time::FramePacer;
