//! Tile coordinate math
//!
//! Conversions between geographic coordinates (latitude/longitude) and
//! Web Mercator slippy-map tile indices.
//!
//! All conversions floor toward negative infinity, so a location exactly on
//! a tile boundary belongs to the tile to its south-east, and locations west
//! of -180° or north of the Mercator limit produce negative indices instead
//! of being clamped.

mod types;

pub use types::{GeoLocation, PixelPoint, TileCoordinate, MAX_LATITUDE, MAX_ZOOM, MIN_LATITUDE};

use std::f64::consts::PI;

#[inline]
fn tiles_at(z: u8) -> f64 {
    2.0_f64.powi(z as i32)
}

/// Longitude of the western edge of tile column `x`.
#[inline]
pub fn longitude_from_tile(x: i32, z: u8) -> f64 {
    x as f64 / tiles_at(z) * 360.0 - 180.0
}

/// Latitude of the northern edge of tile row `y` (inverse Web Mercator).
#[inline]
pub fn latitude_from_tile(y: i32, z: u8) -> f64 {
    let lat_radians = PI - (2.0 * PI) * y as f64 / tiles_at(z);
    lat_radians.exp().atan() / PI * 360.0 - 90.0
}

/// Tile column containing `lon`.
#[inline]
pub fn tile_x_from_longitude(lon: f64, z: u8) -> i32 {
    ((lon + 180.0) / 360.0 * tiles_at(z)).floor() as i32
}

/// Tile row containing `lat`.
///
/// The fractional row is narrowed to `f32` before flooring. A latitude taken
/// from a row edge comes back a few ulps short of the integer row in `f64`;
/// the narrowing snaps it onto the row so tile-aligned viewports do not pick
/// up the row above. The cost is sub-tile precision at high zoom (about
/// 1/256 of a tile at zoom 16).
#[inline]
pub fn tile_y_from_latitude(lat: f64, z: u8) -> i32 {
    let alpha = lat.to_radians();
    let row = (1.0 - ((alpha.sin() + 1.0) / alpha.cos()).ln() / PI) * 0.5 * tiles_at(z);
    (row as f32).floor() as i32
}

impl TileCoordinate {
    /// Tile containing the given location.
    pub fn from_location(location: GeoLocation, z: u8) -> Self {
        Self {
            x: tile_x_from_longitude(location.longitude, z),
            y: tile_y_from_latitude(location.latitude, z),
            z,
        }
    }

    /// Geographic location of the tile's north-west corner.
    pub fn north_west_corner(&self) -> GeoLocation {
        GeoLocation {
            latitude: latitude_from_tile(self.y, self.z),
            longitude: longitude_from_tile(self.x, self.z),
        }
    }
}
