//! The Insprash login splash.
//!
//! A full-screen gradient overlay that greets the user with a short
//! generated message, then closes itself.
//!
//! | Module | Role |
//! |--------|------|
//! | [`acquisition`] | timeout-bounded fetch of generated text, with local fallbacks |
//! | [`service`] | `TextService` contract and the Gemini REST client |
//! | [`render`] | pure CPU painter: gradient plus centered text |
//! | [`controller`] | splash lifecycle: placeholder, refresh, auto-close, Escape |
//! | [`app`] | `Splash` builder wiring the above to the engine runtime |

pub mod acquisition;
pub mod app;
pub mod controller;
pub mod render;
pub mod service;

pub use acquisition::{AcquisitionResult, TextAcquisition, Verdict};
pub use app::{Splash, SplashEvent, WINDOW_TITLE};
pub use controller::{
    AcquisitionLauncher, SplashController, SplashPhase, SplashState, Surface, PLACEHOLDER_MESSAGE,
};
pub use render::{font_size_for, render, Renderer, SplashFont};
pub use service::{GeminiService, ServiceError, TextService};
