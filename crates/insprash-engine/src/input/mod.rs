//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates window events through [`platform`] into
//! `InputEvent`s before handing them to the application.

pub(crate) mod platform;
mod types;

pub use types::{InputEvent, Key, KeyState, Modifiers};
