use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use toml::{Table, Value};

use crate::error::ConfigError;
use crate::values::parse_bool;

pub const DEFAULT_DURATION: Duration = Duration::from_secs(15);
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_millis(2500);
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DURATION_SECS_RANGE: RangeInclusive<u64> = 1..=600;
const TIMEOUT_MS_RANGE: RangeInclusive<u64> = 100..=60_000;

/// Scalar options from the `settings` file.
///
/// The file is TOML with flat `key = value` entries. Booleans also accept the
/// quoted spellings of [`parse_bool`], and numbers may be quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Requested multi-monitor layout. Only the primary display is used.
    pub multi_monitor: bool,
    /// Master switch for text generation.
    pub generation: bool,
    pub duration: Duration,
    pub api_timeout: Duration,
    pub model: String,
    /// Font file to render the message with.
    pub font: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            multi_monitor: false,
            generation: true,
            duration: DEFAULT_DURATION,
            api_timeout: DEFAULT_API_TIMEOUT,
            model: DEFAULT_MODEL.to_string(),
            font: None,
        }
    }
}

impl Settings {
    /// Applies a settings file on top of `self`. Invalid entries keep the
    /// current value and are reported; a file that is not valid TOML changes
    /// nothing.
    pub fn apply(&mut self, text: &str, file: &str) -> Vec<ConfigError> {
        let table = match text.parse::<Table>() {
            Ok(table) => table,
            Err(e) => {
                let line = e.span().map(|span| line_of(text, span.start));
                return vec![ConfigError::new(file, line, format!("not valid TOML: {}", e.message()))];
            }
        };

        let mut errors = Vec::new();
        for (key, value) in &table {
            let key = key.to_ascii_lowercase();
            let outcome = match key.as_str() {
                "multi_monitor" => bool_value(value).map(|v| self.multi_monitor = v),
                "generation" => bool_value(value).map(|v| self.generation = v),
                "duration_secs" => ranged(value, DURATION_SECS_RANGE)
                    .map(|v| self.duration = Duration::from_secs(v)),
                "timeout_ms" => ranged(value, TIMEOUT_MS_RANGE)
                    .map(|v| self.api_timeout = Duration::from_millis(v)),
                "model" => non_empty(value).map(|v| self.model = v.to_string()),
                "font" => non_empty(value).map(|v| self.font = Some(PathBuf::from(v))),
                other => Err(format!("unknown key '{other}'")),
            };

            if let Err(msg) = outcome {
                errors.push(ConfigError::new(file, None, format!("{key}: {msg}")));
            }
        }

        errors
    }
}

/// Parses a settings file on top of the defaults.
pub fn parse_settings(text: &str) -> (Settings, Vec<ConfigError>) {
    let mut settings = Settings::default();
    let errors = settings.apply(text, crate::loader::SETTINGS_FILE);
    (settings, errors)
}

/// 1-based line containing byte `offset`.
fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

fn bool_value(value: &Value) -> Result<bool, String> {
    let parsed = match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(1) => Some(true),
        Value::Integer(0) => Some(false),
        Value::String(s) => parse_bool(s),
        _ => None,
    };
    parsed.ok_or_else(|| format!("{value} is not a boolean (true/false, 1/0, yes/no, on/off)"))
}

fn ranged(value: &Value, range: RangeInclusive<u64>) -> Result<u64, String> {
    let n = match value {
        Value::Integer(i) => u64::try_from(*i).map_err(|_| format!("{i} is negative"))?,
        Value::String(s) => s.trim().parse().map_err(|_| format!("'{s}' is not a whole number"))?,
        other => return Err(format!("expected a whole number, got a {}", other.type_str())),
    };
    if range.contains(&n) {
        Ok(n)
    } else {
        Err(format!("{n} is outside {}..={}", range.start(), range.end()))
    }
}

fn non_empty(value: &Value) -> Result<&str, String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim()),
        Value::String(_) => Err("value must not be empty".to_string()),
        other => Err(format!("expected a string, got a {}", other.type_str())),
    }
}
