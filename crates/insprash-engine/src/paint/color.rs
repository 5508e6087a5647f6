/// Straight-alpha sRGB color with byte channels.
///
/// This is the pixel format of CPU-composited images; it maps 1:1 onto
/// `image::Rgba<u8>` with an opaque alpha.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Srgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Srgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque RGBA pixel.
    #[inline]
    pub const fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }

    /// Blends `self` over `dst` with `coverage` in `0..=255`.
    ///
    /// Used for anti-aliased glyph coverage; 255 replaces `dst`, 0 keeps it.
    #[inline]
    pub fn over(self, dst: Self, coverage: u8) -> Self {
        let a = coverage as u32;
        let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
        Self::new(mix(self.r, dst.r), mix(self.g, dst.g), mix(self.b, dst.b))
    }
}

impl From<image::Rgba<u8>> for Srgb8 {
    #[inline]
    fn from(px: image::Rgba<u8>) -> Self {
        Self::new(px.0[0], px.0[1], px.0[2])
    }
}

/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are multiplied by `a` (premultiplied alpha).
///
/// Only used where the GPU consumes a color directly (surface clears).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    /// Creates a premultiplied color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }
}

impl From<Srgb8> for Color {
    #[inline]
    fn from(c: Srgb8) -> Self {
        Self::from_srgb_u8(c.r, c.g, c.b, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_full_coverage_replaces() {
        let c = Srgb8::WHITE.over(Srgb8::new(10, 20, 30), 255);
        assert_eq!(c, Srgb8::WHITE);
    }

    #[test]
    fn over_zero_coverage_keeps_destination() {
        let dst = Srgb8::new(10, 20, 30);
        assert_eq!(Srgb8::WHITE.over(dst, 0), dst);
    }

    #[test]
    fn over_half_coverage_mixes() {
        let c = Srgb8::WHITE.over(Srgb8::BLACK, 128);
        assert_eq!(c, Srgb8::new(128, 128, 128));
    }

    #[test]
    fn opaque_srgb_converts_to_unit_color() {
        let c = Color::from(Srgb8::WHITE);
        assert_eq!(c, Color::from_straight(1.0, 1.0, 1.0, 1.0));
    }
}
