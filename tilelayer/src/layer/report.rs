//! Render summaries.

use std::time::Duration;

use crate::coord::{PixelPoint, TileCoordinate};
use crate::fetch::FetchReport;
use crate::grid::{TileRange, TileStatus};

/// Where one tile went and how its fetch ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSummary {
    pub coordinate: TileCoordinate,
    pub canvas_position: PixelPoint,
    pub status: TileStatus,
}

/// Outcome of one render call.
///
/// Tile images are not kept; only positions and statuses are reported.
#[derive(Debug, Clone)]
pub struct RenderReport {
    /// Tile range that covered the viewport.
    pub range: TileRange,
    /// Per-tile summaries in row-major order.
    pub tiles: Vec<TileSummary>,
    /// Tiles fetched successfully.
    pub ready: usize,
    /// Tiles drawn as placeholders, interrupted ones included.
    pub failed: usize,
    /// Tiles lost to an interrupted join.
    pub interrupted: usize,
    /// Wall time of the render.
    pub elapsed: Duration,
}

impl RenderReport {
    pub(crate) fn new(range: TileRange, fetched: &FetchReport, elapsed: Duration) -> Self {
        Self {
            range,
            tiles: fetched
                .tiles
                .iter()
                .map(|t| TileSummary {
                    coordinate: t.task.coordinate,
                    canvas_position: t.task.canvas_position,
                    status: t.status(),
                })
                .collect(),
            ready: fetched.ready(),
            failed: fetched.failed(),
            interrupted: fetched.interrupted(),
            elapsed,
        }
    }

    /// Total number of tiles drawn.
    pub fn tiles_total(&self) -> usize {
        self.tiles.len()
    }

    /// `false` when the fetch join was interrupted and some tiles never
    /// reported back.
    pub fn is_complete(&self) -> bool {
        self.interrupted == 0
    }
}
