use glam::{Vec2, Vec4};

use crate::traits::Viewport;

/// Axis-aligned destination rectangle in window pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Normalized device coordinates as (left, top, right, bottom).
    ///
    /// NDC has +y up, so `top > bottom` for any non-empty rect.
    pub fn to_ndc(&self, viewport: Viewport) -> Vec4 {
        if viewport.is_empty() {
            return Vec4::ZERO;
        }
        let scale = Vec2::new(2.0 / viewport.width as f32, -2.0 / viewport.height as f32);
        let origin = Vec2::new(-1.0, 1.0);
        let min = Vec2::new(self.x as f32, self.y as f32) * scale + origin;
        let max = Vec2::new(self.right() as f32, self.bottom() as f32) * scale + origin;
        Vec4::new(min.x, min.y, max.x, max.y)
    }
}

/// Largest rectangle with the source's aspect ratio that fits inside the
/// destination, centered.
pub fn fit(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Rect {
    if src_w == 0 || src_h == 0 {
        return Rect::new(dst_w / 2, dst_h / 2, 0, 0);
    }

    let sx = dst_w as f64 / src_w as f64;
    let sy = dst_h as f64 / src_h as f64;
    let s = sx.min(sy);

    let w = ((src_w as f64 * s).round() as u32).min(dst_w);
    let h = ((src_h as f64 * s).round() as u32).min(dst_h);

    Rect::new((dst_w - w) / 2, (dst_h - h) / 2, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_source_in_square() {
        assert_eq!(fit(1000, 500, 800, 800), Rect::new(0, 200, 800, 400));
    }

    #[test]
    fn test_tall_source_in_wide_viewport() {
        assert_eq!(fit(500, 1000, 1280, 800), Rect::new(440, 0, 400, 800));
    }

    #[test]
    fn test_upscales_small_source() {
        assert_eq!(fit(10, 10, 300, 200), Rect::new(50, 0, 200, 200));
    }

    #[test]
    fn test_zero_destination() {
        let r = fit(640, 480, 0, 0);
        assert_eq!(r.area(), 0);
        assert_eq!((r.x, r.y), (0, 0));

        let r = fit(640, 480, 0, 100);
        assert_eq!(r.area(), 0);
        assert_eq!(r.y, 50);
    }

    #[test]
    fn test_zero_source_does_not_panic() {
        assert_eq!(fit(0, 10, 100, 100), Rect::new(50, 50, 0, 0));
    }

    #[test]
    fn test_ndc_full_viewport() {
        let ndc = Rect::new(0, 0, 800, 600).to_ndc(Viewport::new(800, 600));
        assert!(ndc.abs_diff_eq(Vec4::new(-1.0, 1.0, 1.0, -1.0), 1e-6));
    }

    #[test]
    fn test_ndc_centered_band() {
        let ndc = Rect::new(0, 200, 800, 400).to_ndc(Viewport::new(800, 800));
        assert!((ndc.y - 0.5).abs() < 1e-6);
        assert!((ndc.w + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ndc_empty_viewport() {
        assert_eq!(Rect::new(0, 0, 1, 1).to_ndc(Viewport::default()), Vec4::ZERO);
    }
}
