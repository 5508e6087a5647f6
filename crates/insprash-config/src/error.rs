use std::fmt;

/// A recovered configuration problem.
///
/// These never abort startup; the affected value keeps its default and the
/// error is reported so it can be logged.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Name of the file inside the configuration directory.
    pub file: String,
    /// 1-based line number, when the problem is tied to one line.
    pub line: Option<usize>,
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(file: &str, line: Option<usize>, msg: impl Into<String>) -> Self {
        Self { file: file.to_string(), line, message: msg.into() }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "config error in {}:{}: {}", self.file, line, self.message),
            None => write!(f, "config error in {}: {}", self.file, self.message),
        }
    }
}

impl std::error::Error for ConfigError {}
