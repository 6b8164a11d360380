//! Drawing surface and tile compositing
//!
//! The [`Canvas`] trait is the only thing the renderer needs from a drawing
//! surface. [`RasterCanvas`] implements it over an in-memory RGBA buffer.

mod raster;

pub use raster::RasterCanvas;

use image::RgbaImage;

use crate::fetch::FetchedTile;

/// A drawing surface with a global opacity mode.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Draws `image` with its top-left at `(x, y)`, scaled to
    /// `width × height`, blended source-over with the current opacity.
    fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64, width: u32, height: u32);

    /// Blends subsequent draws with alpha scaled by `alpha`.
    fn set_opacity_mode(&mut self, alpha: f32);

    /// Restores fully opaque source-over drawing.
    fn reset_opacity_mode(&mut self);

    /// Current opacity mode.
    fn opacity(&self) -> f32;
}

/// Draws fetched tiles onto `canvas` in order, at `opacity`.
///
/// Positions are rounded to the nearest pixel. The canvas opacity mode is
/// reset to fully opaque afterwards, so later layers are unaffected.
pub fn composite<C: Canvas + ?Sized>(canvas: &mut C, tiles: &[FetchedTile], opacity: f32) {
    canvas.set_opacity_mode(opacity);

    for tile in tiles {
        let position = tile.task.canvas_position;
        let size = tile.task.tile_size;
        canvas.draw_image(
            tile.image(),
            position.x.round() as i64,
            position.y.round() as i64,
            size,
            size,
        );
    }

    canvas.reset_opacity_mode();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{PixelPoint, TileCoordinate};
    use crate::fetch::TileOutcome;
    use crate::grid::TileRenderTask;
    use image::Rgba;

    fn tile_at(x: f64, y: f64, color: [u8; 4]) -> FetchedTile {
        FetchedTile {
            task: TileRenderTask {
                coordinate: TileCoordinate::new(0, 0, 0),
                canvas_position: PixelPoint::new(x, y),
                true_position: PixelPoint::new(x, y),
                tile_size: 4,
            },
            outcome: TileOutcome::Ready {
                image: RgbaImage::from_pixel(4, 4, Rgba(color)),
            },
        }
    }

    #[test]
    fn test_composite_places_tiles() {
        let mut canvas = RasterCanvas::new(8, 4);
        let tiles = vec![tile_at(0.0, 0.0, [255, 0, 0, 255]), tile_at(4.0, 0.0, [0, 0, 255, 255])];

        composite(&mut canvas, &tiles, 1.0);

        assert_eq!(canvas.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(4, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_composite_rounds_fractional_positions() {
        let mut canvas = RasterCanvas::new(8, 8);
        composite(&mut canvas, &[tile_at(1.6, -0.4, [9, 9, 9, 255])], 1.0);

        assert_eq!(canvas.pixel(1, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(2, 0), Some([9, 9, 9, 255]));
        assert_eq!(canvas.pixel(5, 3), Some([9, 9, 9, 255]));
        assert_eq!(canvas.pixel(2, 4), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_composite_far_off_canvas_positions() {
        let mut canvas = RasterCanvas::new(4, 4);
        let tiles = vec![tile_at(1e300, 0.0, [1, 1, 1, 255]), tile_at(0.0, -1e300, [2, 2, 2, 255])];

        composite(&mut canvas, &tiles, 1.0);

        assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
        assert_eq!(canvas.opacity(), 1.0);
    }

    #[test]
    fn test_composite_resets_opacity() {
        let mut canvas = RasterCanvas::new(4, 4);
        composite(&mut canvas, &[tile_at(0.0, 0.0, [255, 255, 255, 255])], 0.5);

        assert_eq!(canvas.opacity(), 1.0);
        assert_eq!(canvas.pixel(0, 0), Some([255, 255, 255, 128]));
    }
}
