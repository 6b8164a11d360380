//! Concurrent tile fetching with per-tile failure isolation.

use std::any::Any;
use std::sync::Arc;

use futures::future::join_all;
use image::RgbaImage;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};

use super::types::{FetchReport, FetchedTile, TileOutcome};
use crate::config::RenderConfig;
use crate::grid::TileRenderTask;
use crate::placeholder::PlaceholderCache;
use crate::source::{TileError, TileSource};

type FetchResult = Result<RgbaImage, TileError>;

/// How a single fetch came back from the join.
#[derive(Debug)]
enum Joined {
    /// The source returned, successfully or not.
    Done(FetchResult),
    /// The source panicked.
    Panicked(String),
    /// The fetch was cancelled or never dispatched.
    Interrupted(String),
}

/// Fetches the tiles of one render concurrently.
///
/// Each task is handed to its own blocking worker (`spawn_blocking`) in
/// row-major order and the fetcher waits for every one of them before
/// returning. There is no overall timeout and no early exit: a tile that
/// fails, times out inside its source or panics is replaced by a
/// placeholder and the others carry on.
///
/// An optional semaphore caps how many fetches run at once. The cap delays
/// dispatch but never drops a fetch.
#[derive(Debug)]
pub struct TileFetcher {
    limiter: Option<Arc<Semaphore>>,
    placeholder_color: [u8; 4],
}

impl TileFetcher {
    /// Creates a fetcher with its own limiter sized from `config`.
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            limiter: config
                .concurrency_limit()
                .map(|n| Arc::new(Semaphore::new(n))),
            placeholder_color: config.placeholder_color,
        }
    }

    /// Creates a fetcher drawing permits from a limiter shared with other
    /// fetchers, so several layers together stay under one cap.
    ///
    /// The config's own concurrency limit is ignored.
    pub fn with_shared_limiter(config: &RenderConfig, limiter: Arc<Semaphore>) -> Self {
        Self {
            limiter: Some(limiter),
            placeholder_color: config.placeholder_color,
        }
    }

    /// Fetches every task and returns them, resolved, in input order.
    pub async fn fetch_all(
        &self,
        source: Arc<dyn TileSource>,
        tasks: Vec<TileRenderTask>,
    ) -> FetchReport {
        let mut handles = Vec::with_capacity(tasks.len());
        for task in &tasks {
            handles.push(self.dispatch(&source, task).await);
        }

        let joined = join_all(handles.into_iter().map(|handle| async move {
            match handle {
                Ok(handle) => classify(handle.await),
                Err(reason) => Joined::Interrupted(reason),
            }
        }))
        .await;

        let tile_size = tasks.first().map_or(0, |t| t.tile_size);
        let mut placeholders = PlaceholderCache::new(tile_size, self.placeholder_color);

        let tiles: Vec<FetchedTile> = tasks
            .into_iter()
            .zip(joined)
            .map(|(task, joined)| resolve(task, joined, &mut placeholders, source.name()))
            .collect();

        let report = FetchReport { tiles };
        let interrupted = report.interrupted();
        if interrupted > 0 {
            tracing::warn!(
                source = source.name(),
                interrupted,
                total = report.len(),
                "Tile fetch join was interrupted - drawing placeholders for missing tiles"
            );
        }
        report
    }

    /// Starts one fetch, waiting for a limiter permit first if capped.
    async fn dispatch(
        &self,
        source: &Arc<dyn TileSource>,
        task: &TileRenderTask,
    ) -> Result<JoinHandle<FetchResult>, String> {
        let permit = match &self.limiter {
            Some(limiter) => Some(
                Arc::clone(limiter)
                    .acquire_owned()
                    .await
                    .map_err(|e| format!("concurrency limiter unavailable: {}", e))?,
            ),
            None => None,
        };

        let source = Arc::clone(source);
        let tile = task.coordinate;
        Ok(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            source.get_tile(tile.x, tile.y, tile.z)
        }))
    }
}

fn classify(result: Result<FetchResult, JoinError>) -> Joined {
    match result {
        Ok(fetched) => Joined::Done(fetched),
        Err(e) if e.is_panic() => Joined::Panicked(panic_message(e.into_panic())),
        Err(e) => Joined::Interrupted(e.to_string()),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn resolve(
    task: TileRenderTask,
    joined: Joined,
    placeholders: &mut PlaceholderCache,
    source: &str,
) -> FetchedTile {
    let tile = task.coordinate;
    let outcome = match joined {
        Joined::Done(Ok(image)) => {
            tracing::trace!(source, %tile, "Tile fetched");
            TileOutcome::Ready { image }
        }
        Joined::Done(Err(error)) => {
            tracing::debug!(source, %tile, error = %error, "Tile fetch failed - using placeholder");
            TileOutcome::Failed {
                image: placeholders.get(task.tile_size),
                error,
            }
        }
        Joined::Panicked(message) => {
            tracing::debug!(source, %tile, panic = %message, "Tile fetch panicked - using placeholder");
            TileOutcome::Failed {
                image: placeholders.get(task.tile_size),
                error: TileError::Panicked(message),
            }
        }
        Joined::Interrupted(reason) => {
            tracing::debug!(source, %tile, reason = %reason, "Tile fetch interrupted");
            TileOutcome::Interrupted {
                image: placeholders.get(task.tile_size),
                reason,
            }
        }
    };
    FetchedTile { task, outcome }
}
