//! Paint model shared between the splash renderer and the GPU layer.
//!
//! Scope:
//! - byte sRGB colors for CPU compositing (`Srgb8`)
//! - premultiplied float colors for GPU clears (`Color`)
//! - the vertical two-stop gradient used for the splash background

pub mod color;
pub mod gradient;

pub use color::{Color, Srgb8};
pub use gradient::VerticalGradient;
