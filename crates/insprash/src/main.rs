use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use insprash_config::{ConfigLoader, SplashConfig};
use insprash_engine::logging::{init_logging, LoggingConfig};
use insprash_splash::{GeminiService, Splash, TextService};

/// Overrides the config directory lookup.
const CONFIG_DIR_ENV: &str = "INSPRASH_CONFIG_DIR";

/// Sans fonts tried in order when `settings` names none.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());
    log::info!("Insprash launching...");

    let dir = resolve_config_dir(
        std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from),
        dirs::config_dir(),
    );
    log::info!("reading configuration from {}", dir.display());

    let config = ConfigLoader::new(&dir).load().config;

    let mut splash = Splash::new(config.clone());
    if let Some(font) = load_font(&config) {
        splash = splash.font(font);
    }
    if let Some(service) = build_service(&config) {
        splash = splash.service(service);
    }

    match splash.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("splash failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Explicit override, else `<config>/insprash` when it exists, else the
/// current directory.
fn resolve_config_dir(explicit: Option<PathBuf>, platform: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }
    platform
        .map(|base| base.join("insprash"))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn load_font(config: &SplashConfig) -> Option<Vec<u8>> {
    if let Some(path) = config.settings.font.as_deref() {
        match std::fs::read(path) {
            Ok(bytes) => return Some(bytes),
            Err(e) => log::warn!("cannot read font {}: {e}", path.display()),
        }
    }
    first_readable(SYSTEM_FONTS.iter().map(Path::new))
}

fn first_readable<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Option<Vec<u8>> {
    paths.into_iter().find_map(|p| {
        let bytes = std::fs::read(p).ok()?;
        log::debug!("using font {}", p.display());
        Some(bytes)
    })
}

fn build_service(config: &SplashConfig) -> Option<Arc<dyn TextService>> {
    if !config.generation_available() {
        return None;
    }
    let key = config.credential.as_deref()?;
    match GeminiService::new(key, &config.settings.model) {
        Ok(service) => Some(Arc::new(service)),
        Err(e) => {
            log::warn!("text generation unavailable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── config dir ──────────────────────────────────────────────────────

    #[test]
    fn explicit_dir_wins() {
        let platform = tempfile::tempdir().unwrap();
        std::fs::create_dir(platform.path().join("insprash")).unwrap();

        let dir = resolve_config_dir(Some("/etc/insprash".into()), Some(platform.path().into()));
        assert_eq!(dir, PathBuf::from("/etc/insprash"));
    }

    #[test]
    fn platform_dir_used_when_present() {
        let platform = tempfile::tempdir().unwrap();
        std::fs::create_dir(platform.path().join("insprash")).unwrap();

        let dir = resolve_config_dir(None, Some(platform.path().into()));
        assert_eq!(dir, platform.path().join("insprash"));
    }

    #[test]
    fn falls_back_to_current_dir() {
        let platform = tempfile::tempdir().unwrap();
        assert_eq!(resolve_config_dir(None, Some(platform.path().into())), PathBuf::from("."));
        assert_eq!(resolve_config_dir(Some(PathBuf::new()), None), PathBuf::from("."));
    }

    // ── fonts ───────────────────────────────────────────────────────────

    #[test]
    fn first_readable_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("font.ttf");
        std::fs::write(&font, b"font bytes").unwrap();
        let missing = dir.path().join("missing.ttf");

        let bytes = first_readable([missing.as_path(), font.as_path()]);
        assert_eq!(bytes.as_deref(), Some(&b"font bytes"[..]));
        assert_eq!(first_readable([missing.as_path()]), None);
    }

    #[test]
    fn configured_font_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("custom.otf");
        std::fs::write(&font, b"custom").unwrap();

        let mut config = SplashConfig::default();
        config.settings.font = Some(font);
        assert_eq!(load_font(&config).as_deref(), Some(&b"custom"[..]));
    }

    // ── service ─────────────────────────────────────────────────────────

    #[test]
    fn no_service_without_credential() {
        assert!(build_service(&SplashConfig::default()).is_none());
    }

    #[test]
    fn service_built_with_credential() {
        let mut config = SplashConfig::default();
        config.credential = Some("key".into());
        assert!(build_service(&config).is_some());
    }
}
