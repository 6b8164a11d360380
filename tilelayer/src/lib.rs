//! Tilelayer - slippy-map tile layer rendering
//!
//! Renders a raster map by compositing square XYZ tiles onto a canvas:
//! the viewport is turned into the exact range of covering tiles, the tiles
//! are fetched concurrently with per-tile failure isolation, and the results
//! are composited at their pixel positions with a layer-wide opacity.
//!
//! The tile source, projection and canvas are traits
//! ([`TileSource`], [`Projection`], [`Canvas`]) with reference
//! implementations for HTTP, disk and generated tiles, Web Mercator, and an
//! in-memory RGBA buffer.

pub mod canvas;
pub mod config;
pub mod coord;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod layer;
pub mod logging;
pub mod placeholder;
pub mod projection;
pub mod source;
pub mod viewport;

pub use canvas::{Canvas, RasterCanvas};
pub use config::RenderConfig;
pub use error::RenderError;
pub use layer::{RenderReport, TileLayer};
pub use projection::{MercatorProjection, Projection};
pub use source::{TileError, TileSource};
pub use viewport::Viewport;
