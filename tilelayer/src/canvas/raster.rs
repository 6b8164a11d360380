//! In-memory RGBA canvas.

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::Canvas;

/// Canvas backed by an [`RgbaImage`], blending with straight-alpha
/// source-over.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    pixels: RgbaImage,
    opacity: f32,
}

impl RasterCanvas {
    /// Creates a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, [0, 0, 0, 0])
    }

    /// Creates a canvas filled with `color`.
    pub fn with_background(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(color)),
            opacity: 1.0,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }
}

/// Straight-alpha source-over of `src` onto `dst`, with `src` alpha scaled
/// by `opacity`.
fn blend(dst: [u8; 4], src: [u8; 4], opacity: f32) -> [u8; 4] {
    let sa = src[3] as f32 / 255.0 * opacity;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let mut out = [0u8; 4];
    for c in 0..3 {
        let sc = src[c] as f32;
        let dc = dst[c] as f32;
        out[c] = ((sc * sa + dc * da * (1.0 - sa)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let scaled: Cow<'_, RgbaImage> = if image.dimensions() == (width, height) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(imageops::resize(image, width, height, FilterType::Nearest))
        };

        let canvas_w = self.pixels.width() as i64;
        let canvas_h = self.pixels.height() as i64;

        // Clip the destination rectangle to the canvas
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width as i64).min(canvas_w);
        let y1 = y.saturating_add(height as i64).min(canvas_h);

        for cy in y0..y1 {
            for cx in x0..x1 {
                let src = scaled.get_pixel((cx - x) as u32, (cy - y) as u32).0;
                let dst = self.pixels.get_pixel_mut(cx as u32, cy as u32);
                dst.0 = blend(dst.0, src, self.opacity);
            }
        }
    }

    fn set_opacity_mode(&mut self, alpha: f32) {
        self.opacity = alpha.clamp(0.0, 1.0);
    }

    fn reset_opacity_mode(&mut self) {
        self.opacity = 1.0;
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_opaque_replaces() {
        assert_eq!(blend([1, 2, 3, 255], [9, 8, 7, 255], 1.0), [9, 8, 7, 255]);
    }

    #[test]
    fn test_blend_zero_opacity_keeps_destination() {
        assert_eq!(blend([1, 2, 3, 255], [9, 8, 7, 255], 0.0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_blend_half_over_transparent() {
        assert_eq!(blend([0, 0, 0, 0], [200, 100, 50, 255], 0.5), [200, 100, 50, 128]);
    }

    #[test]
    fn test_blend_half_over_opaque() {
        assert_eq!(blend([0, 0, 0, 255], [200, 100, 50, 255], 0.5), [100, 50, 25, 255]);
    }

    #[test]
    fn test_draw_clips_to_canvas() {
        let mut canvas = RasterCanvas::new(4, 4);
        let tile = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));

        canvas.draw_image(&tile, -2, 2, 4, 4);

        assert_eq!(canvas.pixel(0, 2), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(1, 3), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(0, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_fully_outside_is_noop() {
        let mut canvas = RasterCanvas::new(4, 4);
        let tile = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        canvas.draw_image(&tile, 10, 10, 2, 2);
        canvas.draw_image(&tile, -5, 0, 2, 2);
        assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_at_extreme_positions_is_noop() {
        let mut canvas = RasterCanvas::new(4, 4);
        let tile = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        canvas.draw_image(&tile, i64::MAX, 0, 4, 4);
        canvas.draw_image(&tile, 0, i64::MAX, 4, 4);
        canvas.draw_image(&tile, i64::MIN, i64::MIN, 4, 4);
        assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_scales_to_requested_size() {
        let mut canvas = RasterCanvas::new(8, 8);
        let tile = RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 255]));

        canvas.draw_image(&tile, 0, 0, 8, 8);

        assert!(canvas.image().pixels().all(|p| p.0 == [0, 255, 0, 255]));
    }

    #[test]
    fn test_opacity_mode() {
        let mut canvas = RasterCanvas::new(1, 1);
        canvas.set_opacity_mode(0.25);
        assert_eq!(canvas.opacity(), 0.25);
        canvas.set_opacity_mode(3.0);
        assert_eq!(canvas.opacity(), 1.0);
        canvas.set_opacity_mode(0.5);
        canvas.reset_opacity_mode();
        assert_eq!(canvas.opacity(), 1.0);
    }
}
