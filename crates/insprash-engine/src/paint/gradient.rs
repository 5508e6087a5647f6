use super::Srgb8;

/// Two-stop top-to-bottom gradient.
///
/// Semantics:
/// - row `y` of a surface `height` rows tall uses `t = y / height`
/// - each channel is `top + (bottom - top) * t`, truncated toward zero
/// - rows are uniform horizontally
///
/// With this definition row 0 is exactly `top` and the last row stops one
/// interpolation step short of `bottom`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VerticalGradient {
    pub top: Srgb8,
    pub bottom: Srgb8,
}

impl VerticalGradient {
    #[inline]
    pub const fn new(top: Srgb8, bottom: Srgb8) -> Self {
        Self { top, bottom }
    }

    /// Color of row `y` on a surface `height` rows tall.
    pub fn sample(&self, y: u32, height: u32) -> Srgb8 {
        if height == 0 {
            return self.top;
        }
        let t = y as f64 / height as f64;
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t) as u8;
        Srgb8::new(
            lerp(self.top.r, self.bottom.r),
            lerp(self.top.g, self.bottom.g),
            lerp(self.top.b, self.bottom.b),
        )
    }

    /// The 1-pixel-wide column for a surface `height` rows tall.
    pub fn column(&self, height: u32) -> Vec<Srgb8> {
        (0..height).map(|y| self.sample(y, height)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_to_white() -> VerticalGradient {
        VerticalGradient::new(Srgb8::BLACK, Srgb8::WHITE)
    }

    #[test]
    fn first_row_is_top() {
        let g = VerticalGradient::new(Srgb8::new(0x33, 0x0c, 0x5a), Srgb8::new(0x83, 0x17, 0x64));
        assert_eq!(g.sample(0, 1080), g.top);
    }

    #[test]
    fn ten_rows_black_to_white() {
        let col = black_to_white().column(10);
        assert_eq!(col.len(), 10);
        assert_eq!(col[0], Srgb8::BLACK);
        assert_eq!(col[4], Srgb8::new(102, 102, 102));
        assert_eq!(col[5], Srgb8::new(127, 127, 127));
        assert_eq!(col[9], Srgb8::new(229, 229, 229));
    }

    #[test]
    fn descending_channels_truncate_toward_zero() {
        let g = VerticalGradient::new(Srgb8::new(255, 100, 0), Srgb8::new(0, 100, 255));
        // t = 0.5: both 127.5 truncate to 127
        assert_eq!(g.sample(1, 2), Srgb8::new(127, 100, 127));
    }

    #[test]
    fn zero_height_is_empty() {
        assert!(black_to_white().column(0).is_empty());
        assert_eq!(black_to_white().sample(0, 0), Srgb8::BLACK);
    }

    #[test]
    fn monotonic_for_increasing_channels() {
        let col = black_to_white().column(1080);
        assert!(col.windows(2).all(|w| w[0].r <= w[1].r));
    }
}
