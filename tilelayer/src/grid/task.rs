//! Per-tile render tasks and the grid builder that lays them out.

use crate::coord::{PixelPoint, TileCoordinate};
use crate::grid::TileRange;
use crate::projection::Projection;
use crate::viewport::Viewport;

/// Lifecycle of one tile within a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileStatus {
    /// Laid out, not fetched yet.
    Pending,
    /// Fetched successfully.
    Ready,
    /// Fetch failed; a placeholder stands in.
    Failed,
}

/// One unit of fetch-and-place work.
///
/// Immutable once built. The fetch outcome is carried separately by
/// [`FetchedTile`](crate::fetch::FetchedTile).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRenderTask {
    /// Tile to fetch.
    pub coordinate: TileCoordinate,
    /// Where the tile's top-left pixel lands on the canvas.
    pub canvas_position: PixelPoint,
    /// Where the tile's top-left pixel sits in projection pixel space.
    pub true_position: PixelPoint,
    /// Edge length the tile is drawn at.
    pub tile_size: u32,
}

impl TileRenderTask {
    /// Tasks are always pending until the fetcher resolves them.
    pub fn status(&self) -> TileStatus {
        TileStatus::Pending
    }
}

/// Lays out one task per tile in `range`, in row-major order.
///
/// The grid is anchored on the geographic north-west corner of the range's
/// top-left tile (not on the viewport corner), then shifted by the viewport
/// offset into canvas space.
pub fn build_tasks(
    range: &TileRange,
    viewport: &Viewport,
    projection: &dyn Projection,
) -> Vec<TileRenderTask> {
    let tile_size = projection.tile_size();
    let step = tile_size as f64;
    let offset = viewport.offset();

    let corner = range.top_left().north_west_corner();
    let top_left_corner = projection.unproject(corner, range.zoom());

    let columns = range.columns();
    range
        .iter()
        .enumerate()
        .map(|(index, coordinate)| {
            let i = (index % columns) as f64;
            let j = (index / columns) as f64;
            let true_position = top_left_corner.offset_by(i * step, j * step);
            TileRenderTask {
                coordinate,
                canvas_position: true_position.minus(offset),
                true_position,
                tile_size,
            }
        })
        .collect()
}
