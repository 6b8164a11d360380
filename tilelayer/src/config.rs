//! Render configuration.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::placeholder::DEFAULT_PLACEHOLDER_COLOR;

/// Default cap on tile fetches running at the same time.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 64;

/// Settings for how a tile layer renders.
///
/// Neither setting changes what ends up on the canvas for a given set of
/// fetch outcomes: the concurrency cap only limits how many fetches are in
/// flight at once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum number of concurrent fetches, `None` for unbounded.
    pub max_concurrent_fetches: Option<usize>,

    /// RGBA fill of placeholder tiles.
    pub placeholder_color: [u8; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: Some(DEFAULT_MAX_CONCURRENT_FETCHES),
            placeholder_color: DEFAULT_PLACEHOLDER_COLOR,
        }
    }
}

impl RenderConfig {
    /// Parses a configuration from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, RenderError> {
        serde_json::from_str(json).map_err(|e| RenderError::Config(e.to_string()))
    }

    /// Caps concurrent fetches. Zero is raised to one.
    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = Some(limit.max(1));
        self
    }

    /// Removes the concurrency cap.
    pub fn unbounded(mut self) -> Self {
        self.max_concurrent_fetches = None;
        self
    }

    /// Set the placeholder fill color.
    pub fn with_placeholder_color(mut self, color: [u8; 4]) -> Self {
        self.placeholder_color = color;
        self
    }

    /// Effective concurrency limit, with zero treated as one.
    pub fn concurrency_limit(&self) -> Option<usize> {
        self.max_concurrent_fetches.map(|n| n.max(1))
    }
}
