//! Viewport to tile grid
//!
//! [`TileRange::for_viewport`] finds the tiles covering a viewport and
//! [`build_tasks`] lays them out in canvas space.

mod range;
mod task;

pub use range::{TileRange, TileRangeIter};
pub use task::{build_tasks, TileRenderTask, TileStatus};
