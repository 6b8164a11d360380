//! Render-level error types.
//!
//! Per-tile fetch failures are [`TileError`](crate::source::TileError)s and
//! never surface from a render; only problems with the render call itself
//! end up here.

use thiserror::Error;

/// Errors returned by a render call or by layer/viewport setup.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Opacity outside `[0, 1]` or NaN.
    #[error("Invalid opacity {0}: must be within [0, 1]")]
    InvalidOpacity(f32),

    /// Zoom level above the supported maximum.
    #[error("Invalid zoom level {0}")]
    InvalidZoom(u8),

    /// Viewport dimensions or offset unusable.
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    /// Failed to create the Tokio runtime for a blocking render.
    #[error("Failed to create Tokio runtime: {0}")]
    RuntimeCreation(#[source] std::io::Error),

    /// A blocking render was requested from inside an async runtime.
    #[error("draw_blocking called from within an async runtime, use draw().await")]
    BlockingInAsyncContext,

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}
