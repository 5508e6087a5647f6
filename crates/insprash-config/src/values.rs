use std::sync::Arc;

/// Phrase substituted when a fallback file exists but yields no entries.
pub const DEFAULT_FALLBACK: &str = "Never stop creating.";

/// Phrases used when no fallback file exists.
pub const BUILTIN_FALLBACKS: [&str; 9] = [
    "Visualize. Inspire. Create.",
    "Never stop creating.",
    "Build for the world.",
    "Design your dreams.",
    "Unleash your creativity.",
    "Push your limits.",
    "Dare to innovate.",
    "Be bold. Be different.",
    "Make it happen.",
];

/// Prompts longer than this are cut (at a char boundary).
pub const MAX_PROMPT_CHARS: usize = 1000;

/// Non-empty, ordered list of locally stored messages.
///
/// Cloning is cheap; the phrases are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSet {
    phrases: Arc<[String]>,
}

impl FallbackSet {
    /// Builds a set from arbitrary candidates. Blank entries are dropped and
    /// an empty result is replaced by [`DEFAULT_FALLBACK`].
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases: Vec<String> = candidates
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if phrases.is_empty() {
            phrases.push(DEFAULT_FALLBACK.to_string());
        }

        Self { phrases: phrases.into() }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_FALLBACKS)
    }

    /// Parses a fallback file: one phrase per line.
    pub fn parse(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Always present; the set is never empty.
    pub fn first(&self) -> &str {
        self.phrases.first().map_or(DEFAULT_FALLBACK, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.iter().any(|p| p == phrase)
    }
}

impl Default for FallbackSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Interprets the credential file. Empty, `null` and `none` mean "disabled".
pub fn parse_credential(text: &str) -> Option<String> {
    let key = text.trim();
    if key.is_empty() || key.eq_ignore_ascii_case("null") || key.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(key.to_string())
    }
}

/// Trims and caps the prompt. `None` when nothing is left.
pub fn parse_prompt(text: &str) -> Option<String> {
    let prompt = text.trim();
    if prompt.is_empty() {
        return None;
    }
    Some(prompt.chars().take(MAX_PROMPT_CHARS).collect())
}

/// Accepts `true/false`, `1/0`, `yes/no`, `on/off` in any case.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses a fallback file into a [`FallbackSet`]. Same as [`FallbackSet::parse`].
pub fn parse_fallbacks(text: &str) -> FallbackSet {
    FallbackSet::parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── FallbackSet ───────────────────────────────────────────────────────

    #[test]
    fn parse_drops_blank_lines_and_trims() {
        let set = FallbackSet::parse("Hello\n\n   \n  World  \r\n");
        assert_eq!(set.phrases(), ["Hello".to_string(), "World".to_string()]);
    }

    #[test]
    fn empty_input_substitutes_default() {
        for text in ["", "\n\n", "   \n\t"] {
            let set = FallbackSet::parse(text);
            assert_eq!(set.len(), 1);
            assert_eq!(set.first(), DEFAULT_FALLBACK);
        }
    }

    #[test]
    fn builtin_has_all_phrases_in_order() {
        let set = FallbackSet::builtin();
        assert_eq!(set.len(), BUILTIN_FALLBACKS.len());
        assert_eq!(set.first(), "Visualize. Inspire. Create.");
        assert!(set.contains("Make it happen."));
    }

    // ── credential ────────────────────────────────────────────────────────

    #[test]
    fn credential_disabled_values() {
        for text in ["", "  \n", "null", "NULL", " None "] {
            assert_eq!(parse_credential(text), None, "{text:?}");
        }
    }

    #[test]
    fn credential_is_trimmed() {
        assert_eq!(parse_credential("  abc123\n"), Some("abc123".to_string()));
    }

    // ── prompt ────────────────────────────────────────────────────────────

    #[test]
    fn prompt_trimmed_and_blank_rejected() {
        assert_eq!(parse_prompt("  Say hi.\n"), Some("Say hi.".to_string()));
        assert_eq!(parse_prompt(" \n "), None);
    }

    #[test]
    fn prompt_capped_on_char_boundary() {
        let long = "é".repeat(MAX_PROMPT_CHARS + 50);
        let prompt = parse_prompt(&long).unwrap();
        assert_eq!(prompt.chars().count(), MAX_PROMPT_CHARS);
    }

    // ── bool ──────────────────────────────────────────────────────────────

    #[test]
    fn bool_accepted_spellings() {
        for t in ["true", "TRUE", "1", "yes", "Yes", "on", " ON "] {
            assert_eq!(parse_bool(t), Some(true), "{t:?}");
        }
        for f in ["false", "0", "no", "NO", "off", "Off"] {
            assert_eq!(parse_bool(f), Some(false), "{f:?}");
        }
    }

    #[test]
    fn bool_rejects_other_values() {
        for bad in ["", "2", "y", "enabled", "truee"] {
            assert_eq!(parse_bool(bad), None, "{bad:?}");
        }
    }
}
