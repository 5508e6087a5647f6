//! Insprash engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the splash:
//! a single full-screen window, a wgpu surface that shows one CPU-composited
//! image, keyboard mapping, logging setup, and the timing primitives the
//! splash schedules against.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
pub mod paint;
pub mod text;
