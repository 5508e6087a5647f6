use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Straight sRGB color, one byte per channel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_color(s)
    }
}

/// Parses `#rrggbb` or `#rgb`. The leading `#` is optional and digits are
/// case-insensitive; surrounding whitespace is ignored.
pub fn parse_hex_color(src: &str) -> Result<Rgb, String> {
    let s = src.trim();
    let digits = s.strip_prefix('#').unwrap_or(s);

    let nibbles: Vec<u8> = digits
        .bytes()
        .map(hex_value)
        .collect::<Option<_>>()
        .ok_or_else(|| format!("'{s}' contains a non-hex digit"))?;

    match nibbles.as_slice() {
        &[r, g, b] => Ok(Rgb::new(r * 17, g * 17, b * 17)),
        &[r1, r0, g1, g0, b1, b0] => Ok(Rgb::new(r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0)),
        _ => Err(format!(
            "color must be #rrggbb or #rgb, got {} digits in '{s}'",
            nibbles.len()
        )),
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

// ── gradient ──────────────────────────────────────────────────────────────

/// Top and bottom endpoints of the splash background.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GradientSpec {
    pub top: Rgb,
    pub bottom: Rgb,
}

impl GradientSpec {
    pub const DEFAULT_TOP: Rgb = Rgb::new(0x33, 0x0c, 0x5a);
    pub const DEFAULT_BOTTOM: Rgb = Rgb::new(0x83, 0x17, 0x64);

    #[inline]
    pub const fn new(top: Rgb, bottom: Rgb) -> Self {
        Self { top, bottom }
    }

    /// Applies the contents of a gradient file on top of `self`.
    ///
    /// The first non-blank line is the top color, the second the bottom color.
    /// A malformed line leaves that endpoint unchanged.
    pub fn apply(&mut self, text: &str, file: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        for slot in [&mut self.top, &mut self.bottom] {
            let Some((idx, line)) = lines.next() else {
                errors.push(ConfigError::new(file, None, "expected two colors (top, bottom)"));
                break;
            };
            match parse_hex_color(line) {
                Ok(rgb) => *slot = rgb,
                Err(e) => errors.push(ConfigError::new(file, Some(idx + 1), e)),
            }
        }

        if let Some((idx, _)) = lines.next() {
            errors.push(ConfigError::new(file, Some(idx + 1), "extra lines after the bottom color are ignored"));
        }

        errors
    }
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOP, Self::DEFAULT_BOTTOM)
    }
}
