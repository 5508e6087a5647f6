use std::io;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::values::{parse_credential, parse_prompt, FallbackSet};
use crate::SplashConfig;

pub const CREDENTIAL_FILE: &str = "gemini_api_key";
pub const GRADIENT_FILE: &str = "gradient";
pub const FALLBACKS_FILE: &str = "fallbacks";
pub const PROMPT_FILE: &str = "prompt";
pub const SETTINGS_FILE: &str = "settings";

/// Result of [`ConfigLoader::load`]: a usable configuration plus every
/// problem that was recovered from along the way.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SplashConfig,
    pub errors: Vec<ConfigError>,
}

/// Reads the configuration files from one directory.
///
/// Missing files are not errors; they simply leave the defaults in place.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads every file. Never fails; each recovered problem is logged at
    /// `warn` and returned in [`LoadedConfig::errors`].
    pub fn load(&self) -> LoadedConfig {
        let mut config = SplashConfig::default();
        let mut errors = Vec::new();

        if let Some(text) = self.read(CREDENTIAL_FILE, &mut errors) {
            config.credential = parse_credential(&text);
            if config.credential.is_none() {
                log::info!("{CREDENTIAL_FILE} is empty or disabled; text generation is off");
            }
        } else {
            log::info!("no {CREDENTIAL_FILE} in {}; text generation is off", self.dir.display());
        }

        if let Some(text) = self.read(GRADIENT_FILE, &mut errors) {
            errors.extend(config.gradient.apply(&text, GRADIENT_FILE));
        }

        if let Some(text) = self.read(FALLBACKS_FILE, &mut errors) {
            config.fallbacks = FallbackSet::parse(&text);
        }

        if let Some(text) = self.read(PROMPT_FILE, &mut errors) {
            match parse_prompt(&text) {
                Some(prompt) => config.prompt = prompt,
                None => errors.push(ConfigError::new(PROMPT_FILE, None, "prompt is empty; using the built-in prompt")),
            }
        }

        if let Some(text) = self.read(SETTINGS_FILE, &mut errors) {
            errors.extend(config.settings.apply(&text, SETTINGS_FILE));
        }

        for e in &errors {
            log::warn!("{e}");
        }

        log::debug!(
            "config loaded from {}: gradient {} -> {}, {} fallback phrase(s), generation {}",
            self.dir.display(),
            config.gradient.top,
            config.gradient.bottom,
            config.fallbacks.len(),
            if config.generation_available() { "on" } else { "off" },
        );

        LoadedConfig { config, errors }
    }

    fn read(&self, name: &str, errors: &mut Vec<ConfigError>) -> Option<String> {
        let path = self.dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} not found; using defaults", path.display());
                None
            }
            Err(e) => {
                errors.push(ConfigError::new(name, None, format!("unreadable: {e}")));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use super::*;
    use crate::color::{GradientSpec, Rgb};
    use crate::DEFAULT_PROMPT;

    #[test]
    fn empty_directory_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ConfigLoader::new(dir.path()).load();
        assert!(loaded.errors.is_empty());
        assert_eq!(loaded.config, SplashConfig::default());
    }

    #[test]
    fn every_file_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CREDENTIAL_FILE), "  secret \n").unwrap();
        fs::write(dir.path().join(GRADIENT_FILE), "#000000\n#fff\n").unwrap();
        fs::write(dir.path().join(FALLBACKS_FILE), "Hello\n\nWorld\n").unwrap();
        fs::write(dir.path().join(PROMPT_FILE), "\n  Greet me.  \n").unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "duration_secs = 7\ntimeout_ms = 500\n").unwrap();

        let loaded = ConfigLoader::new(dir.path()).load();
        assert!(loaded.errors.is_empty(), "{:?}", loaded.errors);

        let cfg = loaded.config;
        assert_eq!(cfg.credential.as_deref(), Some("secret"));
        assert_eq!(cfg.gradient, GradientSpec::new(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)));
        assert_eq!(cfg.fallbacks.phrases(), ["Hello".to_string(), "World".to_string()]);
        assert_eq!(cfg.prompt, "Greet me.");
        assert_eq!(cfg.duration(), Duration::from_secs(7));
        assert_eq!(cfg.api_timeout(), Duration::from_millis(500));
        assert!(cfg.generation_available());
    }

    #[test]
    fn malformed_files_recover_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CREDENTIAL_FILE), "none").unwrap();
        fs::write(dir.path().join(GRADIENT_FILE), "purple\n#12345\n").unwrap();
        fs::write(dir.path().join(FALLBACKS_FILE), "\n\n").unwrap();
        fs::write(dir.path().join(PROMPT_FILE), "   ").unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "multi_monitor = \"sometimes\"\n").unwrap();

        let loaded = ConfigLoader::new(dir.path()).load();
        let cfg = loaded.config;

        assert_eq!(cfg.credential, None);
        assert_eq!(cfg.gradient, GradientSpec::default());
        assert_eq!(cfg.fallbacks, FallbackSet::new([crate::values::DEFAULT_FALLBACK]));
        assert_eq!(cfg.prompt, DEFAULT_PROMPT);
        assert!(!cfg.settings.multi_monitor);
        // two gradient lines, the prompt and the settings line
        assert_eq!(loaded.errors.len(), 4, "{:?}", loaded.errors);
    }

    #[test]
    fn unreadable_entry_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a file is expected cannot be read as text.
        fs::create_dir(dir.path().join(PROMPT_FILE)).unwrap();

        let loaded = ConfigLoader::new(dir.path()).load();
        assert_eq!(loaded.config.prompt, DEFAULT_PROMPT);
        assert_eq!(loaded.errors.len(), 1);
        assert_eq!(loaded.errors[0].file, PROMPT_FILE);
    }
}
