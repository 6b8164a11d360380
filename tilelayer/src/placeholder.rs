//! Placeholder tiles for failed fetches.
//!
//! When a tile cannot be fetched the renderer draws a solid square of the
//! tile's size instead, so the rest of the map still renders and the gap is
//! visible as a flat light-grey cell.

use image::{Rgba, RgbaImage};

/// Default placeholder color: opaque `#EEEEEE`.
pub const DEFAULT_PLACEHOLDER_COLOR: [u8; 4] = [0xEE, 0xEE, 0xEE, 0xFF];

/// Generate a solid placeholder tile.
///
/// # Arguments
///
/// * `tile_size` - Edge length in pixels
/// * `color` - RGBA fill color
///
/// # Example
///
/// ```
/// use tilelayer::placeholder::{generate_placeholder, DEFAULT_PLACEHOLDER_COLOR};
///
/// let tile = generate_placeholder(256, DEFAULT_PLACEHOLDER_COLOR);
/// assert_eq!(tile.dimensions(), (256, 256));
/// ```
pub fn generate_placeholder(tile_size: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(tile_size, tile_size, Rgba(color))
}

/// Lazily built placeholder shared by every failed tile of one render.
///
/// All tiles of a render have the same size, so the image is generated at
/// most once and cloned per failure.
#[derive(Debug)]
pub struct PlaceholderCache {
    tile_size: u32,
    color: [u8; 4],
    image: Option<RgbaImage>,
}

impl PlaceholderCache {
    pub fn new(tile_size: u32, color: [u8; 4]) -> Self {
        Self {
            tile_size,
            color,
            image: None,
        }
    }

    /// Returns a placeholder of `tile_size`, reusing the cached one when the
    /// size matches.
    pub fn get(&mut self, tile_size: u32) -> RgbaImage {
        if tile_size != self.tile_size {
            return generate_placeholder(tile_size, self.color);
        }
        self.image
            .get_or_insert_with(|| generate_placeholder(self.tile_size, self.color))
            .clone()
    }
}
