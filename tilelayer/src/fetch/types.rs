//! Fetch outcome types.

use image::RgbaImage;

use crate::grid::{TileRenderTask, TileStatus};
use crate::source::TileError;

/// What happened to one tile's fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum TileOutcome {
    /// The source returned an image.
    Ready { image: RgbaImage },
    /// The source failed or panicked; `image` is a placeholder.
    Failed { image: RgbaImage, error: TileError },
    /// The fetch never reported back because the join itself was cut
    /// short; `image` is a placeholder.
    Interrupted { image: RgbaImage, reason: String },
}

/// A render task together with its resolved outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTile {
    pub task: TileRenderTask,
    pub outcome: TileOutcome,
}

impl FetchedTile {
    /// Terminal status. Interrupted fetches count as failed.
    pub fn status(&self) -> TileStatus {
        match self.outcome {
            TileOutcome::Ready { .. } => TileStatus::Ready,
            TileOutcome::Failed { .. } | TileOutcome::Interrupted { .. } => TileStatus::Failed,
        }
    }

    /// Image to draw, real or placeholder.
    pub fn image(&self) -> &RgbaImage {
        match &self.outcome {
            TileOutcome::Ready { image }
            | TileOutcome::Failed { image, .. }
            | TileOutcome::Interrupted { image, .. } => image,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self.outcome, TileOutcome::Interrupted { .. })
    }
}

/// All fetched tiles of one render, in row-major order.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub tiles: Vec<FetchedTile>,
}

impl FetchReport {
    /// Number of tiles fetched successfully.
    pub fn ready(&self) -> usize {
        self.count(|t| t.status() == TileStatus::Ready)
    }

    /// Number of tiles replaced by a placeholder, interrupted ones included.
    pub fn failed(&self) -> usize {
        self.count(|t| t.status() == TileStatus::Failed)
    }

    /// Number of tiles whose fetch was lost to a join interruption.
    pub fn interrupted(&self) -> usize {
        self.count(FetchedTile::is_interrupted)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    fn count(&self, pred: impl Fn(&FetchedTile) -> bool) -> usize {
        self.tiles.iter().filter(|&t| pred(t)).count()
    }
}
