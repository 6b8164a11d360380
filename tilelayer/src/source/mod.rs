//! Tile source abstraction
//!
//! A [`TileSource`] is the fetch capability of a tile layer. The renderer
//! only ever calls `get_tile(x, y, z)` and treats any error the same way,
//! so concrete sources are free to decide what counts as a valid tile.
//!
//! ```ignore
//! use tilelayer::source::{HttpTileSource, ReqwestClient};
//! use tilelayer::TileLayer;
//!
//! let client = ReqwestClient::new()?;
//! let source = HttpTileSource::new(client, "https://tile.openstreetmap.org/{z}/{x}/{y}.png");
//! let layer = TileLayer::new(source);
//! ```

mod disk;
mod http;
mod procedural;
mod types;

pub use disk::DiskTileSource;
pub use http::{
    HttpClient, HttpTileSource, ReqwestClient, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
};
pub use procedural::{ProceduralTileSource, BORDER_COLOR};
pub use types::{TileError, TileSource};

#[cfg(test)]
pub use http::tests::MockHttpClient;
