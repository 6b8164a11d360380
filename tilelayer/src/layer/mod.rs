//! Tile layer: the unit that renders a viewport's worth of tiles.
//!
//! A render runs in four steps:
//!
//! ```text
//! Viewport ──► TileRange ──► build_tasks ──► TileFetcher ──► composite
//!              (corners)     (row-major)     (parallel,      (sequential,
//!                                             join all)       opacity)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use tilelayer::{MercatorProjection, RasterCanvas, TileLayer, Viewport};
//! use tilelayer::coord::GeoLocation;
//! use tilelayer::source::ProceduralTileSource;
//!
//! let projection = MercatorProjection::new();
//! let viewport =
//!     Viewport::centered_on(GeoLocation::new(50.5, 5.5), 14, 1024, 1024, &projection).unwrap();
//!
//! let layer = TileLayer::new(ProceduralTileSource::new());
//! layer.set_opacity(0.8).unwrap();
//!
//! let mut canvas = RasterCanvas::new(1024, 1024);
//! let report = layer.draw_blocking(&mut canvas, &viewport, &projection).unwrap();
//! assert!(report.is_complete());
//! ```

mod report;

pub use report::{RenderReport, TileSummary};

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;

use crate::canvas::{composite, Canvas};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::fetch::TileFetcher;
use crate::grid::{build_tasks, TileRange, TileRenderTask};
use crate::projection::Projection;
use crate::source::TileSource;
use crate::viewport::Viewport;

/// A map layer drawn from slippy-map tiles.
///
/// Layers are long-lived and may be shared between threads; opacity is
/// stored atomically so it can be changed through a shared reference. A
/// render reads it once at the start, so changing it mid-render affects
/// the next render only.
pub struct TileLayer {
    source: Arc<dyn TileSource>,
    opacity: AtomicU32,
    config: RenderConfig,
    fetcher: TileFetcher,
}

impl TileLayer {
    /// Creates a fully opaque layer over `source` with default settings.
    pub fn new(source: impl TileSource + 'static) -> Self {
        Self::from_shared(Arc::new(source))
    }

    /// Creates a layer over a source that is shared with other owners.
    pub fn from_shared(source: Arc<dyn TileSource>) -> Self {
        let config = RenderConfig::default();
        Self {
            source,
            opacity: AtomicU32::new(1.0f32.to_bits()),
            fetcher: TileFetcher::new(&config),
            config,
        }
    }

    /// Replaces the render configuration.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.fetcher = TileFetcher::new(&config);
        self.config = config;
        self
    }

    /// Draws fetch permits from a limiter shared with other layers.
    pub fn with_shared_limiter(mut self, limiter: Arc<Semaphore>) -> Self {
        self.fetcher = TileFetcher::with_shared_limiter(&self.config, limiter);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn source(&self) -> &dyn TileSource {
        self.source.as_ref()
    }

    /// Opacity between 0 (invisible) and 1 (opaque).
    pub fn opacity(&self) -> f32 {
        f32::from_bits(self.opacity.load(Ordering::Acquire))
    }

    /// Sets the opacity used by subsequent renders.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidOpacity`] if `opacity` is NaN or outside `[0, 1]`.
    pub fn set_opacity(&self, opacity: f32) -> Result<(), RenderError> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(RenderError::InvalidOpacity(opacity));
        }
        self.opacity.store(opacity.to_bits(), Ordering::Release);
        Ok(())
    }

    /// Computes the tile range and laid-out tasks for `viewport` without
    /// fetching anything.
    pub fn plan(
        &self,
        viewport: &Viewport,
        projection: &dyn Projection,
    ) -> (TileRange, Vec<TileRenderTask>) {
        let range = TileRange::for_viewport(viewport, projection);
        let tasks = build_tasks(&range, viewport, projection);
        (range, tasks)
    }

    /// Renders the layer onto `canvas`.
    ///
    /// Waits until every tile fetch has finished. Failed tiles are drawn as
    /// placeholders and never fail the render; check
    /// [`RenderReport::is_complete`] to learn whether the fetch join was
    /// interrupted.
    pub async fn draw<C>(
        &self,
        canvas: &mut C,
        viewport: &Viewport,
        projection: &dyn Projection,
    ) -> RenderReport
    where
        C: Canvas + ?Sized,
    {
        let started = Instant::now();
        let opacity = self.opacity();
        let (range, tasks) = self.plan(viewport, projection);

        tracing::debug!(
            source = self.source.name(),
            zoom = viewport.zoom(),
            top_left = %range.top_left(),
            bottom_right = %range.bottom_right(),
            tiles = tasks.len(),
            opacity,
            "Rendering tile layer"
        );

        let fetched = self
            .fetcher
            .fetch_all(Arc::clone(&self.source), tasks)
            .await;

        composite(canvas, &fetched.tiles, opacity);

        let report = RenderReport::new(range, &fetched, started.elapsed());
        tracing::debug!(
            source = self.source.name(),
            ready = report.ready,
            failed = report.failed,
            interrupted = report.interrupted,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Tile layer rendered"
        );
        report
    }

    /// Blocking variant of [`draw`](Self::draw) for synchronous callers.
    ///
    /// Runs the render on a private current-thread runtime.
    ///
    /// # Errors
    ///
    /// - [`RenderError::BlockingInAsyncContext`] when called from inside a
    ///   Tokio runtime
    /// - [`RenderError::RuntimeCreation`] if the runtime cannot be built
    pub fn draw_blocking<C>(
        &self,
        canvas: &mut C,
        viewport: &Viewport,
        projection: &dyn Projection,
    ) -> Result<RenderReport, RenderError>
    where
        C: Canvas + ?Sized,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(RenderError::BlockingInAsyncContext);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RenderError::RuntimeCreation)?;

        Ok(runtime.block_on(self.draw(canvas, viewport, projection)))
    }
}

impl std::fmt::Debug for TileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLayer")
            .field("source", &self.source.name())
            .field("opacity", &self.opacity())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RasterCanvas;
    use crate::coord::{GeoLocation, PixelPoint};
    use crate::grid::TileStatus;
    use crate::projection::MercatorProjection;
    use crate::source::{HttpTileSource, MockHttpClient, ProceduralTileSource, TileError};

    fn small_viewport() -> Viewport {
        Viewport::new(512, 512, 3, PixelPoint::new(256.0, 512.0)).unwrap()
    }

    #[test]
    fn test_default_opacity_is_opaque() {
        let layer = TileLayer::new(ProceduralTileSource::new());
        assert_eq!(layer.opacity(), 1.0);
    }

    #[test]
    fn test_set_opacity() {
        let layer = TileLayer::new(ProceduralTileSource::new());
        layer.set_opacity(0.5).unwrap();
        assert_eq!(layer.opacity(), 0.5);
        layer.set_opacity(0.0).unwrap();
        assert_eq!(layer.opacity(), 0.0);
    }

    #[test]
    fn test_set_opacity_rejects_out_of_range() {
        let layer = TileLayer::new(ProceduralTileSource::new());
        assert!(matches!(
            layer.set_opacity(1.5),
            Err(RenderError::InvalidOpacity(_))
        ));
        assert!(matches!(
            layer.set_opacity(-0.1),
            Err(RenderError::InvalidOpacity(_))
        ));
        assert!(matches!(
            layer.set_opacity(f32::NAN),
            Err(RenderError::InvalidOpacity(_))
        ));
        assert_eq!(layer.opacity(), 1.0);
    }

    #[test]
    fn test_plan_matches_range() {
        let layer = TileLayer::new(ProceduralTileSource::new());
        let proj = MercatorProjection::new();
        let (range, tasks) = layer.plan(&small_viewport(), &proj);

        assert_eq!(tasks.len(), range.len());
        assert_eq!(tasks[0].coordinate, range.top_left());
        assert_eq!(tasks.last().unwrap().coordinate, range.bottom_right());
    }

    #[tokio::test]
    async fn test_draw_reports_every_tile() {
        let layer = TileLayer::new(ProceduralTileSource::new().with_failures(|t| t.x == 2));
        let proj = MercatorProjection::new();
        let mut canvas = RasterCanvas::new(512, 512);

        let report = layer.draw(&mut canvas, &small_viewport(), &proj).await;

        assert_eq!(report.tiles_total(), report.range.len());
        assert_eq!(report.ready + report.failed, report.tiles_total());
        assert!(report.failed > 0);
        assert!(report.is_complete());
        for tile in &report.tiles {
            let expected = if tile.coordinate.x == 2 {
                TileStatus::Failed
            } else {
                TileStatus::Ready
            };
            assert_eq!(tile.status, expected);
        }
    }

    #[tokio::test]
    async fn test_draw_with_http_errors_uses_placeholders() {
        let client = MockHttpClient::new(Err(TileError::Http("HTTP 503".to_string())));
        let layer = TileLayer::new(HttpTileSource::new(client, "http://t/{z}/{x}/{y}.png"))
            .with_config(RenderConfig::default().with_placeholder_color([255, 0, 255, 255]));
        let proj = MercatorProjection::new();
        let mut canvas = RasterCanvas::new(512, 512);

        let report = layer.draw(&mut canvas, &small_viewport(), &proj).await;

        assert_eq!(report.ready, 0);
        assert_eq!(report.failed, report.tiles_total());
        assert_eq!(canvas.pixel(100, 100), Some([255, 0, 255, 255]));
    }

    #[tokio::test]
    async fn test_draw_blocking_refuses_inside_runtime() {
        let layer = TileLayer::new(ProceduralTileSource::new());
        let proj = MercatorProjection::new();
        let mut canvas = RasterCanvas::new(16, 16);
        let vp = Viewport::new(16, 16, 1, PixelPoint::default()).unwrap();

        let result = layer.draw_blocking(&mut canvas, &vp, &proj);
        assert!(matches!(result, Err(RenderError::BlockingInAsyncContext)));
    }

    #[test]
    fn test_draw_blocking() {
        let layer = TileLayer::new(ProceduralTileSource::new().with_tile_size(256));
        let proj = MercatorProjection::new();
        let vp = Viewport::centered_on(GeoLocation::new(0.0, 0.0), 1, 256, 256, &proj).unwrap();
        let mut canvas = RasterCanvas::new(256, 256);

        let report = layer.draw_blocking(&mut canvas, &vp, &proj).unwrap();

        assert_eq!(report.tiles_total(), 4);
        assert_eq!(report.ready, 4);
    }

    #[test]
    fn test_layer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TileLayer>();
    }

    #[test]
    fn test_debug_shows_source_name() {
        let layer = TileLayer::new(ProceduralTileSource::new());
        assert!(format!("{:?}", layer).contains("Procedural"));
    }
}
