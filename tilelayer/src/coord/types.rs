//! Coordinate value types.

use std::fmt;

/// Maximum supported zoom level.
///
/// `2^30` tiles per axis still fits an `i32` tile index.
pub const MAX_ZOOM: u8 = 30;

/// Maximum latitude representable in Web Mercator.
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Minimum latitude representable in Web Mercator.
pub const MIN_LATITUDE: f64 = -85.05112878;

/// A position in canvas (or projection) pixel space.
///
/// Origin is top-left, `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise translation.
    pub fn offset_by(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Component-wise difference `self - other`.
    pub fn minus(self, other: PixelPoint) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// A geographic location in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Tile grid indices at zoom level `z`.
///
/// Under normal operation `x, y ∈ [0, 2^z)`, but values outside that range
/// show up at extreme pan positions and are carried as-is. Whether such a
/// tile exists is for the tile source to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoordinate {
    /// Column, increasing eastward
    pub x: i32,
    /// Row, increasing southward
    pub y: i32,
    /// Zoom level
    pub z: u8,
}

impl TileCoordinate {
    pub fn new(x: i32, y: i32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Number of tiles along one axis at this zoom level, or `None` above
    /// [`MAX_ZOOM`].
    pub fn tiles_per_axis(&self) -> Option<i64> {
        (self.z <= MAX_ZOOM).then(|| 1i64 << self.z)
    }

    /// Whether the indices fall inside the `2^z × 2^z` grid. Always `false`
    /// above [`MAX_ZOOM`].
    pub fn is_within_grid(&self) -> bool {
        match self.tiles_per_axis() {
            Some(n) => (0..n).contains(&(self.x as i64)) && (0..n).contains(&(self.y as i64)),
            None => false,
        }
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}
