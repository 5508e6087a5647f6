use std::convert::Infallible;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use image::RgbaImage;
use insprash_config::GradientSpec;
use insprash_engine::paint::{Srgb8, VerticalGradient};
use insprash_engine::text::{FontId, FontSystem, TextLayout};
use profont::PROFONT_24_POINT;

/// Share of the surface width available to a line of text.
pub const TEXT_RATIO: f32 = 0.65;

/// Smallest font size, in pixels.
pub const MIN_FONT_PX: u32 = 18;

const TEXT_COLOR: Srgb8 = Srgb8::WHITE;

/// Font the message is drawn with.
pub enum SplashFont {
    /// A TrueType/OpenType font scaled to the surface.
    Vector { fonts: FontSystem, id: FontId },
    /// Fixed-size bitmap font compiled into the binary.
    Builtin,
}

impl SplashFont {
    /// Loads `bytes` as a vector font, falling back to the built-in bitmap
    /// font when there are none or they do not parse.
    pub fn load(bytes: Option<&[u8]>) -> Self {
        let Some(bytes) = bytes else {
            log::info!("no font file available; using the built-in bitmap font");
            return SplashFont::Builtin;
        };

        let mut fonts = FontSystem::new();
        match fonts.load_font(bytes) {
            Ok(id) => SplashFont::Vector { fonts, id },
            Err(e) => {
                log::warn!("{e}; using the built-in bitmap font");
                SplashFont::Builtin
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, SplashFont::Builtin)
    }
}

/// `max(18, floor(min(width, height) * 0.05))`.
pub fn font_size_for(width: u32, height: u32) -> u32 {
    let short = width.min(height) as f64;
    ((short * 0.05).floor() as u32).max(MIN_FONT_PX)
}

/// Converts configured endpoints into the paint gradient.
pub fn gradient_from(spec: &GradientSpec) -> VerticalGradient {
    VerticalGradient::new(
        Srgb8::new(spec.top.r, spec.top.g, spec.top.b),
        Srgb8::new(spec.bottom.r, spec.bottom.g, spec.bottom.b),
    )
}

/// Immutable font + gradient pair that paints splash frames.
pub struct Renderer {
    gradient: VerticalGradient,
    font: SplashFont,
}

impl Renderer {
    pub fn new(gradient: VerticalGradient, font: SplashFont) -> Self {
        Self { gradient, font }
    }

    pub fn gradient(&self) -> VerticalGradient {
        self.gradient
    }

    pub fn render(&self, width: u32, height: u32, message: &str) -> RgbaImage {
        render(width, height, &self.gradient, message, &self.font)
    }
}

/// Paints one splash frame: the vertical gradient with `message` centered
/// on top in white.
///
/// Zero-sized dimensions yield an empty image.
pub fn render(
    width: u32,
    height: u32,
    gradient: &VerticalGradient,
    message: &str,
    font: &SplashFont,
) -> RgbaImage {
    if width == 0 || height == 0 {
        return RgbaImage::new(0, 0);
    }

    let column = gradient.column(height);
    let mut image = RgbaImage::from_fn(width, height, |_, y| column[y as usize].to_rgba());

    if message.trim().is_empty() {
        return image;
    }

    match font {
        SplashFont::Vector { fonts, id } => {
            let px = font_size_for(width, height) as f32;
            let layout = fonts.layout(message, *id, px, width as f32 * TEXT_RATIO);
            composite_layout(&mut image, &layout);
        }
        SplashFont::Builtin => draw_builtin(&mut image, message),
    }

    image
}

/// Rounded offset that centers a span of `inner` inside `outer`.
fn center_offset(outer: u32, inner: i32) -> i32 {
    ((outer as f32 - inner as f32) / 2.0).round() as i32
}

fn composite_layout(image: &mut RgbaImage, layout: &TextLayout) {
    let Some(bounds) = layout.bounds() else { return };
    let (w, h) = image.dimensions();

    let dx = center_offset(w, bounds.width()) - bounds.min_x;
    let dy = center_offset(h, bounds.height()) - bounds.min_y;

    for glyph in &layout.glyphs {
        for gy in 0..glyph.height {
            let y = glyph.y + dy + gy as i32;
            if y < 0 || y >= h as i32 {
                continue;
            }
            for gx in 0..glyph.width {
                let x = glyph.x + dx + gx as i32;
                if x < 0 || x >= w as i32 {
                    continue;
                }
                let coverage = glyph.coverage[gy * glyph.width + gx];
                if coverage == 0 {
                    continue;
                }
                let px = image.get_pixel_mut(x as u32, y as u32);
                *px = TEXT_COLOR.over(Srgb8::from(*px), coverage).to_rgba();
            }
        }
    }
}

fn draw_builtin(image: &mut RgbaImage, message: &str) {
    let (w, h) = image.dimensions();
    let advance = PROFONT_24_POINT.character_size.width + PROFONT_24_POINT.character_spacing;
    let max_chars = ((w as f32 * TEXT_RATIO) / advance.max(1) as f32).floor().max(1.0) as usize;

    let wrapped = wrap_words(message, max_chars).join("\n");
    let style = MonoTextStyle::new(&PROFONT_24_POINT, Rgb888::WHITE);
    let layout = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();

    let text = Text::with_text_style(&wrapped, Point::zero(), style, layout);
    let bb = text.bounding_box();
    let offset = Point::new(
        center_offset(w, bb.size.width as i32) - bb.top_left.x,
        center_offset(h, bb.size.height as i32) - bb.top_left.y,
    );

    let mut canvas = ImageCanvas { image };
    let Ok(_) = text.translate(offset).draw(&mut canvas);
}

/// Greedy word wrap to at most `max_chars` per line. Words longer than a
/// line are split.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if line.is_empty() { word.len() } else { line.chars().count() + 1 + word.len() };
        if needed > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// `DrawTarget` over an RGBA image; pixels outside are dropped.
struct ImageCanvas<'a> {
    image: &'a mut RgbaImage,
}

impl OriginDimensions for ImageCanvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for ImageCanvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = self.image.dimensions();
        for Pixel(p, c) in pixels {
            if p.x < 0 || p.y < 0 || p.x as u32 >= w || p.y as u32 >= h {
                continue;
            }
            self.image.put_pixel(p.x as u32, p.y as u32, image::Rgba([c.r(), c.g(), c.b(), 255]));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use insprash_engine::text::PlacedGlyph;

    use super::*;

    fn splash_gradient() -> VerticalGradient {
        gradient_from(&GradientSpec::default())
    }

    fn row(image: &RgbaImage, y: u32) -> Vec<[u8; 4]> {
        (0..image.width()).map(|x| image.get_pixel(x, y).0).collect()
    }

    /// Bounding box of pure-white pixels as (min_x, min_y, max_x, max_y), inclusive.
    fn white_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, px) in image.enumerate_pixels() {
            if px.0 == [255, 255, 255, 255] {
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((a, b, c, d)) => (a.min(x), b.min(y), c.max(x), d.max(y)),
                });
            }
        }
        bounds
    }

    // ── gradient ────────────────────────────────────────────────────────

    #[test]
    fn first_row_is_top_color() {
        let g = splash_gradient();
        let image = render(64, 48, &g, "", &SplashFont::Builtin);
        assert!(row(&image, 0).iter().all(|px| *px == g.top.to_rgba().0));
    }

    #[test]
    fn last_row_within_one_step_of_bottom() {
        let g = splash_gradient();
        let h = 48;
        let image = render(16, h, &g, "", &SplashFont::Builtin);
        let last = image.get_pixel(0, h - 1).0;
        let bottom = g.bottom.to_rgba().0;
        let top = g.top.to_rgba().0;
        for c in 0..3 {
            let step = (bottom[c] as i32 - top[c] as i32).abs() / h as i32 + 1;
            assert!((last[c] as i32 - bottom[c] as i32).abs() <= step, "channel {c}");
        }
    }

    #[test]
    fn black_to_white_rows() {
        let g = VerticalGradient::new(Srgb8::BLACK, Srgb8::WHITE);
        let image = render(3, 10, &g, "", &SplashFont::Builtin);
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 4).0, [102, 102, 102, 255]);
        assert_eq!(image.get_pixel(1, 5).0, [127, 127, 127, 255]);
        assert_eq!(image.get_pixel(1, 9).0, [229, 229, 229, 255]);
    }

    #[test]
    fn rows_are_uniform_without_text() {
        let image = render(40, 30, &splash_gradient(), "   ", &SplashFont::Builtin);
        for y in 0..30 {
            let r = row(&image, y);
            assert!(r.iter().all(|px| *px == r[0]), "row {y}");
        }
    }

    #[test]
    fn zero_size_is_empty() {
        let g = splash_gradient();
        assert_eq!(render(0, 100, &g, "hi", &SplashFont::Builtin).dimensions(), (0, 0));
        assert_eq!(render(100, 0, &g, "hi", &SplashFont::Builtin).dimensions(), (0, 0));
    }

    // ── text ────────────────────────────────────────────────────────────

    #[test]
    fn builtin_text_is_centered() {
        let (w, h) = (800, 400);
        let image = render(w, h, &splash_gradient(), "Make it happen.", &SplashFont::Builtin);
        let (x0, y0, x1, y1) = white_bounds(&image).expect("text drawn");

        let cx = (x0 + x1 + 1) as f32 / 2.0;
        let cy = (y0 + y1 + 1) as f32 / 2.0;
        // Centering works on glyph cells; ink sits somewhere inside them.
        let cell = PROFONT_24_POINT.character_size;
        assert!((cx - w as f32 / 2.0).abs() <= cell.width as f32 / 2.0, "cx {cx}");
        assert!((cy - h as f32 / 2.0).abs() <= cell.height as f32 / 2.0, "cy {cy}");
    }

    #[test]
    fn builtin_text_wraps_within_text_ratio() {
        let (w, h) = (400, 600);
        let message = "Visualize. Inspire. Create. Never stop creating. Build for the world.";
        let image = render(w, h, &splash_gradient(), message, &SplashFont::Builtin);
        let (x0, y0, x1, y1) = white_bounds(&image).expect("text drawn");

        assert!((x1 - x0 + 1) as f32 <= w as f32 * TEXT_RATIO + 1.0);
        // Several lines of a 24pt font.
        assert!(y1 - y0 > 2 * PROFONT_24_POINT.character_size.height);
    }

    fn solid_glyph(x: i32, y: i32, width: usize, height: usize) -> PlacedGlyph {
        PlacedGlyph { x, y, width, height, coverage: vec![255; width * height] }
    }

    fn black(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn layout_ink_is_centered_to_the_nearest_pixel() {
        // Ink spans x 10..49 and y -5..7 in layout space: 39 x 12 pixels.
        let layout = TextLayout {
            glyphs: vec![solid_glyph(10, -5, 20, 12), solid_glyph(40, 0, 9, 6)],
        };
        let mut image = black(101, 77);
        composite_layout(&mut image, &layout);

        // (101 - 39) / 2 = 31 exactly; (77 - 12) / 2 = 32.5 rounds to 33.
        assert_eq!(white_bounds(&image), Some((31, 33, 69, 44)));
        let (x0, y0, x1, y1) = white_bounds(&image).unwrap();
        assert_eq!((x0, 101 - 1 - x1), (31, 31));
        assert_eq!((y0, 77 - 1 - y1), (33, 32));
    }

    #[test]
    fn layout_wider_than_image_is_clipped() {
        let layout = TextLayout { glyphs: vec![solid_glyph(0, 0, 40, 4)] };
        let mut image = black(21, 15);
        composite_layout(&mut image, &layout);

        // Offset is round(-9.5) = -10 horizontally and round(5.5) = 6 vertically.
        assert_eq!(white_bounds(&image), Some((0, 6, 20, 9)));
        assert_eq!(image.get_pixel(10, 5).0, [0, 0, 0, 255]);
    }

    #[test]
    fn partial_coverage_blends_over_background() {
        let glyph = PlacedGlyph { x: 0, y: 0, width: 1, height: 1, coverage: vec![128] };
        let mut image = black(3, 3);
        composite_layout(&mut image, &TextLayout { glyphs: vec![glyph] });

        assert_eq!(image.get_pixel(1, 1).0, [128, 128, 128, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn bad_font_bytes_fall_back_to_builtin() {
        assert!(SplashFont::load(Some(b"not a font")).is_builtin());
        assert!(SplashFont::load(None).is_builtin());
    }

    #[test]
    fn font_size_scales_with_short_side() {
        assert_eq!(font_size_for(1920, 1080), 54);
        assert_eq!(font_size_for(1080, 1920), 54);
        assert_eq!(font_size_for(300, 200), MIN_FONT_PX);
        assert_eq!(font_size_for(0, 0), MIN_FONT_PX);
    }

    #[test]
    fn renderer_uses_its_gradient() {
        let r = Renderer::new(splash_gradient(), SplashFont::Builtin);
        let image = r.render(10, 10, "");
        assert_eq!(image.get_pixel(0, 0).0, r.gradient().top.to_rgba().0);
    }

    // ── wrap_words ──────────────────────────────────────────────────────

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap_words("Be bold. Be different.", 10), ["Be bold.", "Be", "different."]);
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap_words("  Dare   to innovate. ", 40), ["Dare to innovate."]);
    }

    #[test]
    fn long_words_are_split() {
        assert_eq!(wrap_words("abcdefghij k", 4), ["abcd", "efgh", "ij k"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_words("   ", 10).is_empty());
    }
}
