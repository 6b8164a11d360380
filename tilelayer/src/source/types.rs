//! Tile source trait and errors.

use std::time::Duration;

use image::RgbaImage;
use thiserror::Error;

/// Errors a tile source can report for a single tile.
///
/// The renderer treats every variant identically: the tile is replaced by
/// a placeholder and the render continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TileError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Tile bytes could not be decoded into an image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Server has no tile at this address.
    #[error("Tile not found: {0}")]
    NotFound(String),

    /// Local I/O failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Tile indices fall outside the grid at this zoom level.
    #[error("Tile {x},{y} is outside the grid at zoom {z}")]
    OutOfRange { x: i32, y: i32, z: u8 },

    /// Source does not serve this zoom level.
    #[error("Unsupported zoom level: {0}")]
    UnsupportedZoom(u8),

    /// Source gave up waiting for the tile.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The fetch panicked.
    #[error("Tile fetch panicked: {0}")]
    Panicked(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for TileError {
    fn from(e: image::ImageError) -> Self {
        TileError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for TileError {
    fn from(e: std::io::Error) -> Self {
        TileError::Io(e.to_string())
    }
}

/// Fetch capability of a tile layer.
///
/// Implementations must be thread-safe (`Send + Sync`): the renderer calls
/// `get_tile` for every visible tile concurrently, each call on its own
/// blocking worker.
///
/// # Implementors
///
/// - [`HttpTileSource`](super::HttpTileSource) - fetches from a tile server
/// - [`DiskTileSource`](super::DiskTileSource) - reads a `z/x/y` directory tree
/// - [`ProceduralTileSource`](super::ProceduralTileSource) - generated tiles for tests
pub trait TileSource: Send + Sync {
    /// Fetches the image for tile `(x, y)` at zoom `z`.
    ///
    /// Indices may be outside the `2^z` grid; sources decide whether that
    /// is an error.
    fn get_tile(&self, x: i32, y: i32, z: u8) -> Result<RgbaImage, TileError>;

    /// Human-readable name, used in logs.
    fn name(&self) -> &str;
}

impl<T: TileSource + ?Sized> TileSource for std::sync::Arc<T> {
    fn get_tile(&self, x: i32, y: i32, z: u8) -> Result<RgbaImage, TileError> {
        (**self).get_tile(x, y, z)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
