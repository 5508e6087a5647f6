use std::fmt;

use fontdue::layout::{
    CoordinateSystem, HorizontalAlign, Layout, LayoutSettings, TextStyle, WrapStyle,
};

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// One rasterized glyph positioned in layout space.
///
/// `coverage` is a row-major `width * height` alpha mask.
#[derive(Debug, Clone)]
pub struct PlacedGlyph {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

/// Ink bounds of a [`TextLayout`], in layout pixels. `max_*` are exclusive.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl TextBounds {
    #[inline]
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }
}

/// Wrapped, rasterized text ready to be composited.
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    pub glyphs: Vec<PlacedGlyph>,
}

impl TextLayout {
    /// Bounding box of every visible glyph, or `None` when nothing has ink
    /// (empty or whitespace-only text).
    pub fn bounds(&self) -> Option<TextBounds> {
        self.glyphs
            .iter()
            .filter(|g| g.width > 0 && g.height > 0)
            .map(|g| TextBounds {
                min_x: g.x,
                min_y: g.y,
                max_x: g.x + g.width as i32,
                max_y: g.y + g.height as i32,
            })
            .reduce(|a, b| TextBounds {
                min_x: a.min_x.min(b.min_x),
                min_y: a.min_y.min(b.min_y),
                max_x: a.max_x.max(b.max_x),
                max_y: a.max_y.max(b.max_y),
            })
    }
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading, so a `FontSystem` can be shared by
/// reference between any number of layout calls.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    /// Returns a reference to the underlying `fontdue::Font`, if `id` is valid.
    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Number of fonts loaded so far.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Lays out `text` word-wrapped at `max_width` with every line centered in
    /// `[0, max_width)`, and rasterizes each glyph.
    ///
    /// Unknown `id`s produce an empty layout.
    pub fn layout(&self, text: &str, id: FontId, px: f32, max_width: f32) -> TextLayout {
        let Some(font) = self.get(id) else {
            return TextLayout::default();
        };

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            max_width: Some(max_width.max(1.0)),
            horizontal_align: HorizontalAlign::Center,
            wrap_style: WrapStyle::Word,
            ..LayoutSettings::default()
        });
        layout.append(&[font], &TextStyle::new(text, px, 0));

        let glyphs = layout
            .glyphs()
            .iter()
            .filter(|g| g.width > 0 && g.height > 0)
            .map(|g| {
                let (_, coverage) = font.rasterize_config(g.key);
                PlacedGlyph {
                    x: g.x.round() as i32,
                    y: g.y.round() as i32,
                    width: g.width,
                    height: g.height,
                    coverage,
                }
            })
            .collect();

        TextLayout { glyphs }
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}
