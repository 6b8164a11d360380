//! Procedurally generated tiles.
//!
//! Useful as a test double for the renderer and as a debug layer: every tile
//! is a solid color derived from its coordinate, framed by a one pixel black
//! border, so misplaced or missing tiles are easy to spot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{Rgba, RgbaImage};

use super::types::{TileError, TileSource};
use crate::coord::TileCoordinate;
use crate::projection::DEFAULT_TILE_SIZE;

type FailurePredicate = Arc<dyn Fn(TileCoordinate) -> bool + Send + Sync>;

/// Border color of generated tiles.
pub const BORDER_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Generates deterministic tiles, optionally failing or stalling on demand.
pub struct ProceduralTileSource {
    tile_size: u32,
    fail_when: Option<FailurePredicate>,
    latency: Duration,
    timeout: Option<Duration>,
    fetches: AtomicUsize,
}

impl ProceduralTileSource {
    /// Creates a source producing 256 px tiles that never fail.
    pub fn new() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            fail_when: None,
            latency: Duration::ZERO,
            timeout: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Sets the edge length of generated tiles.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size.max(1);
        self
    }

    /// Makes every tile matching `predicate` fail.
    pub fn with_failures<F>(mut self, predicate: F) -> Self
    where
        F: Fn(TileCoordinate) -> bool + Send + Sync + 'static,
    {
        self.fail_when = Some(Arc::new(predicate));
        self
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Gives up with [`TileError::Timeout`] once a fetch would exceed
    /// `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Number of `get_tile` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Fill color used for a tile's interior.
    pub fn color_for(coordinate: TileCoordinate) -> [u8; 4] {
        let channel = |v: i64| (64 + v.rem_euclid(8) * 24) as u8;
        [
            channel(coordinate.x as i64),
            channel(coordinate.y as i64),
            channel(coordinate.z as i64),
            255,
        ]
    }

    fn render(&self, coordinate: TileCoordinate) -> RgbaImage {
        let size = self.tile_size;
        let fill = Rgba(Self::color_for(coordinate));
        let border = Rgba(BORDER_COLOR);

        RgbaImage::from_fn(size, size, |px, py| {
            if px == 0 || py == 0 || px == size - 1 || py == size - 1 {
                border
            } else {
                fill
            }
        })
    }
}

impl Default for ProceduralTileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for ProceduralTileSource {
    fn get_tile(&self, x: i32, y: i32, z: u8) -> Result<RgbaImage, TileError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let coordinate = TileCoordinate::new(x, y, z);

        match self.timeout {
            Some(timeout) if self.latency > timeout => {
                std::thread::sleep(timeout);
                return Err(TileError::Timeout(timeout));
            }
            _ if !self.latency.is_zero() => std::thread::sleep(self.latency),
            _ => {}
        }

        if let Some(ref fail_when) = self.fail_when {
            if fail_when(coordinate) {
                return Err(TileError::Other(format!("simulated failure for {}", coordinate)));
            }
        }

        Ok(self.render(coordinate))
    }

    fn name(&self) -> &str {
        "Procedural"
    }
}
