//! Map projection abstraction.
//!
//! The rendering core never does projection math itself. It asks a
//! [`Projection`] to move between projection pixel space and geographic
//! locations, and to report the fixed tile pixel size.
//!
//! [`MercatorProjection`] is the standard spherical Web Mercator projection
//! used by slippy-map tile services.

use std::f64::consts::PI;

use crate::coord::{GeoLocation, PixelPoint};

/// Default slippy-map tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Pixel ↔ geographic conversions at a given zoom level.
///
/// `project` and `unproject` must be approximate inverses of each other,
/// otherwise tile grid alignment drifts.
pub trait Projection: Send + Sync {
    /// Geographic location of a point in projection pixel space.
    fn project(&self, pixel: PixelPoint, zoom: u8) -> GeoLocation;

    /// Projection pixel space position of a geographic location.
    fn unproject(&self, location: GeoLocation, zoom: u8) -> PixelPoint;

    /// Edge length of one tile in pixels.
    fn tile_size(&self) -> u32;
}

/// Spherical Web Mercator projection.
///
/// At zoom `z` the world is a square of `tile_size · 2^z` pixels with
/// (-180°, ~85.05°) at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MercatorProjection {
    tile_size: u32,
}

impl MercatorProjection {
    /// Creates a projection with the standard 256 px tiles.
    pub fn new() -> Self {
        Self::with_tile_size(DEFAULT_TILE_SIZE)
    }

    /// Creates a projection with a custom tile edge length.
    pub fn with_tile_size(tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
        }
    }

    /// World edge length in pixels at the given zoom level.
    pub fn world_size(&self, zoom: u8) -> f64 {
        self.tile_size as f64 * 2.0_f64.powi(zoom as i32)
    }
}

impl Default for MercatorProjection {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for MercatorProjection {
    fn project(&self, pixel: PixelPoint, zoom: u8) -> GeoLocation {
        let world = self.world_size(zoom);
        let longitude = pixel.x / world * 360.0 - 180.0;
        let latitude = (PI - 2.0 * PI * pixel.y / world).exp().atan() / PI * 360.0 - 90.0;
        GeoLocation {
            latitude,
            longitude,
        }
    }

    fn unproject(&self, location: GeoLocation, zoom: u8) -> PixelPoint {
        let world = self.world_size(zoom);
        let alpha = location.latitude.to_radians();
        let x = (location.longitude + 180.0) / 360.0 * world;
        let y = (1.0 - ((alpha.sin() + 1.0) / alpha.cos()).ln() / PI) * 0.5 * world;
        PixelPoint { x, y }
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }
}
