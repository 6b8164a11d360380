//! Viewport description consumed by the renderer.

use crate::coord::{GeoLocation, PixelPoint, MAX_ZOOM};
use crate::error::RenderError;
use crate::projection::Projection;

/// The visible canvas region.
///
/// `offset` is the position of the canvas origin in projection pixel
/// space, so canvas pixel `(0, 0)` shows projection pixel `offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    zoom: u8,
    offset: PixelPoint,
}

impl Viewport {
    /// Creates a viewport from explicit values.
    ///
    /// # Errors
    ///
    /// - [`RenderError::InvalidViewport`] for a zero dimension or a
    ///   non-finite offset
    /// - [`RenderError::InvalidZoom`] above [`MAX_ZOOM`]
    pub fn new(width: u32, height: u32, zoom: u8, offset: PixelPoint) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidViewport(format!(
                "dimensions must be non-zero, got {}×{}",
                width, height
            )));
        }
        if !offset.x.is_finite() || !offset.y.is_finite() {
            return Err(RenderError::InvalidViewport(format!(
                "offset must be finite, got ({}, {})",
                offset.x, offset.y
            )));
        }
        if zoom > MAX_ZOOM {
            return Err(RenderError::InvalidZoom(zoom));
        }
        Ok(Self {
            width,
            height,
            zoom,
            offset,
        })
    }

    /// Creates a viewport whose canvas center shows `center`.
    pub fn centered_on(
        center: GeoLocation,
        zoom: u8,
        width: u32,
        height: u32,
        projection: &dyn Projection,
    ) -> Result<Self, RenderError> {
        if zoom > MAX_ZOOM {
            return Err(RenderError::InvalidZoom(zoom));
        }
        let center_px = projection.unproject(center, zoom);
        let offset = center_px.offset_by(-(width as f64) / 2.0, -(height as f64) / 2.0);
        Self::new(width, height, zoom, offset)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn offset(&self) -> PixelPoint {
        self.offset
    }

    /// Projection-space position of the canvas top-left corner.
    pub fn top_left(&self) -> PixelPoint {
        self.offset
    }

    /// Projection-space position of the canvas bottom-right corner.
    pub fn bottom_right(&self) -> PixelPoint {
        self.offset
            .offset_by(self.width as f64, self.height as f64)
    }
}
