//! Concurrent tile fetching
//!
//! Dispatches one fetch per tile, isolates failures behind placeholders and
//! joins everything before the compositor runs.

mod fetcher;
mod types;

pub use fetcher::TileFetcher;
pub use types::{FetchReport, FetchedTile, TileOutcome};
