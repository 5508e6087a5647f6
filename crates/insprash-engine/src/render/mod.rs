//! GPU rendering subsystem.
//!
//! The overlay is composited on the CPU, so the GPU side is a single
//! full-screen textured quad ([`ImageRenderer`]). Renderers own their GPU
//! resources (pipelines, buffers, textures) and rebuild them lazily.

mod ctx;
mod blit;

pub use ctx::{RenderCtx, RenderTarget};
pub use blit::ImageRenderer;
