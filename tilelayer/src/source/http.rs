//! HTTP tile source and the client abstraction behind it.

use std::time::Duration;

use image::RgbaImage;
use reqwest::StatusCode;

use super::types::{TileError, TileSource};
use crate::coord::{TileCoordinate, MAX_ZOOM};

/// Request timeout used by [`ReqwestClient::new`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent by [`ReqwestClient::new`].
pub const DEFAULT_USER_AGENT: &str = concat!("tilelayer/", env!("CARGO_PKG_VERSION"));

/// Transport used by [`HttpTileSource`] to download tile bodies.
///
/// Implementations report tiles the server does not have as
/// [`TileError::NotFound`], so sparse coverage can be told apart from
/// server trouble in the logs.
pub trait HttpClient: Send + Sync {
    /// Downloads the tile body at `url`.
    fn fetch_tile(&self, url: &str) -> Result<Vec<u8>, TileError>;
}

/// Blocking reqwest transport.
///
/// Fetches already run on blocking workers, so the blocking client is used.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl ReqwestClient {
    /// Creates a client with [`DEFAULT_REQUEST_TIMEOUT`] and
    /// [`DEFAULT_USER_AGENT`].
    pub fn new() -> Result<Self, TileError> {
        Self::with_settings(DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Creates a client with its own timeout and user agent. Public tile
    /// servers usually require an agent that identifies the application.
    pub fn with_settings(timeout: Duration, user_agent: &str) -> Result<Self, TileError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| TileError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> TileError {
        if e.is_timeout() {
            TileError::Timeout(self.timeout)
        } else {
            TileError::Http(format!("{}: {}", url, e))
        }
    }
}

impl HttpClient for ReqwestClient {
    fn fetch_tile(&self, url: &str) -> Result<Vec<u8>, TileError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.transport_error(url, e))?;

        if let Some(error) = status_error(response.status(), url) {
            return Err(error);
        }

        let body = response
            .bytes()
            .map_err(|e| self.transport_error(url, e))?;
        if body.is_empty() {
            return Err(TileError::NotFound(url.to_string()));
        }
        Ok(body.to_vec())
    }
}

/// Error a tile server status stands for, if any.
///
/// Servers answer `204`, `404` or `410` for tiles outside their coverage.
fn status_error(status: StatusCode, url: &str) -> Option<TileError> {
    match status {
        StatusCode::NO_CONTENT | StatusCode::NOT_FOUND | StatusCode::GONE => {
            Some(TileError::NotFound(url.to_string()))
        }
        s if s.is_success() => None,
        StatusCode::TOO_MANY_REQUESTS => Some(TileError::Http(format!("rate limited by {}", url))),
        s => Some(TileError::Http(format!("HTTP {} from {}", s.as_u16(), url))),
    }
}

/// Tile source backed by an XYZ tile server.
///
/// The URL template uses `{z}`, `{x}` and `{y}` placeholders, e.g.
/// `https://tile.openstreetmap.org/{z}/{x}/{y}.png`.
///
/// # Example
///
/// ```no_run
/// use tilelayer::source::{HttpTileSource, ReqwestClient};
///
/// let client = ReqwestClient::new().unwrap();
/// let source = HttpTileSource::new(client, "https://tile.openstreetmap.org/{z}/{x}/{y}.png");
/// ```
pub struct HttpTileSource<C: HttpClient> {
    http_client: C,
    url_template: String,
    name: String,
    min_zoom: u8,
    max_zoom: u8,
}

impl<C: HttpClient> HttpTileSource<C> {
    /// Creates a source serving zoom levels 0 through 19.
    pub fn new(http_client: C, url_template: impl Into<String>) -> Self {
        Self {
            http_client,
            url_template: url_template.into(),
            name: "HTTP".to_string(),
            min_zoom: 0,
            max_zoom: 19,
        }
    }

    /// Sets the name reported in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restricts the zoom levels requested from the server. The upper bound
    /// is capped at [`MAX_ZOOM`].
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.min(MAX_ZOOM);
        self
    }

    /// Builds the tile URL for the given coordinates.
    fn build_url(&self, x: i32, y: i32, z: u8) -> String {
        self.url_template
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl<C: HttpClient> TileSource for HttpTileSource<C> {
    fn get_tile(&self, x: i32, y: i32, z: u8) -> Result<RgbaImage, TileError> {
        if !(self.min_zoom..=self.max_zoom).contains(&z) {
            return Err(TileError::UnsupportedZoom(z));
        }
        if !TileCoordinate::new(x, y, z).is_within_grid() {
            return Err(TileError::OutOfRange { x, y, z });
        }

        let url = self.build_url(x, y, z);
        let bytes = self.http_client.fetch_tile(&url)?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
