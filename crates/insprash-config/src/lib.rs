//! Configuration provider for the **Insprash** login splash.
//!
//! Every value the splash needs is read once at startup from small plain-text
//! files in a single directory. Nothing in here is fatal: malformed or missing
//! input is replaced by a documented default and reported as a [`ConfigError`]
//! so the caller can log it.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`color`] | `Rgb`, `GradientSpec`, hex parsing |
//! | [`values`] | `FallbackSet`, credential / prompt / bool parsing |
//! | [`settings`] | `Settings` (flat TOML file) |
//! | [`loader`] | `ConfigLoader`, `LoadedConfig` |
//! | [`error`] | `ConfigError` |
//!
//! # Quick start
//!
//! ```rust
//! use insprash_config::{GradientSpec, Rgb};
//!
//! let mut gradient = GradientSpec::default();
//! let errors = gradient.apply("#000\nnot-a-color\n", "gradient");
//! assert_eq!(gradient.top, Rgb::new(0, 0, 0));
//! assert_eq!(gradient.bottom, GradientSpec::default().bottom);
//! assert_eq!(errors.len(), 1);
//! ```

pub mod color;
pub mod error;
pub mod loader;
pub mod settings;
pub mod values;

use std::time::Duration;

pub use color::{parse_hex_color, GradientSpec, Rgb};
pub use error::ConfigError;
pub use loader::{ConfigLoader, LoadedConfig};
pub use settings::{parse_settings, Settings};
pub use values::{parse_bool, parse_credential, parse_fallbacks, parse_prompt, FallbackSet};

/// Prompt sent to the text generation service when no `prompt` file exists.
pub const DEFAULT_PROMPT: &str = "Generate one single, short, inspiring sentence about creativity \
or productivity that nicely greets people when they login to their computer. Don't surround it \
with any characters or apply any formatting, only write the sentence.";

/// Everything the splash reads from the configuration directory.
///
/// Immutable after loading; share it by reference or clone the pieces a
/// worker thread needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SplashConfig {
    /// API credential. `None` disables text generation.
    pub credential: Option<String>,
    pub gradient: GradientSpec,
    pub fallbacks: FallbackSet,
    pub prompt: String,
    pub settings: Settings,
}

impl SplashConfig {
    /// True when a generation request should be attempted at all.
    pub fn generation_available(&self) -> bool {
        self.settings.generation && self.credential.is_some()
    }

    /// How long the splash stays on screen.
    pub fn duration(&self) -> Duration {
        self.settings.duration
    }

    /// Upper bound on the wait for generated text.
    pub fn api_timeout(&self) -> Duration {
        self.settings.api_timeout
    }
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            credential: None,
            gradient: GradientSpec::default(),
            fallbacks: FallbackSet::builtin(),
            prompt: DEFAULT_PROMPT.to_string(),
            settings: Settings::default(),
        }
    }
}
