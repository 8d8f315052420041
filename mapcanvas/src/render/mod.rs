//! Map rendering entry point.
//!
//! [`Renderer::render`] turns a [`RenderConfig`] into a finished raster:
//!
//! 1. Validate the coordinate, zoom and layout
//! 2. Apply the [`LatitudePolicy`] and project with Web Mercator
//! 3. Find the center tile and the sub-tile offset
//! 4. Enumerate the tile grid and compose it
//! 5. Draw a center marker built from the theme
//!
//! Every render is independent. The marker is constructed per call and the
//! whole render runs under an optional timeout.

mod layout;
mod marker;
mod theme;

pub use layout::{Layout, LayoutError};
pub use marker::Marker;
pub use theme::{parse_color, MarkerStyle, Theme, ThemeError};

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::compose::{ComposeError, CompositeRaster, Compositor};
use crate::coord::{
    project, validate_zoom, AbsolutePosition, CoordError, GeoCoordinate, LatitudePolicy,
    SubTileOffset, TileAddress,
};
use crate::grid::{enumerate_grid, TileGrid};
use crate::provider::{AsyncReqwestClient, ProviderConfig};
use crate::source::{HttpTileSource, TileSource};

/// Default zoom level for a render.
pub const DEFAULT_ZOOM: u8 = 14;

/// Default limit for a whole render.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors that abort a render.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The coordinate is out of range or projects to a non-finite position.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordError),

    /// Layout, zoom or provider settings cannot produce a map.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A tile could not be fetched or decoded.
    #[error("Composition failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("Render timed out after {0:?}")]
    Timeout(Duration),
}

impl From<LayoutError> for RenderError {
    fn from(err: LayoutError) -> Self {
        RenderError::Configuration(err.to_string())
    }
}

/// What to render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub theme: Theme,
    pub layout: Layout,
}

impl RenderConfig {
    /// Default theme and layout centered on the given coordinate.
    pub fn new(latitude: f64, longitude: f64, zoom: u8) -> Self {
        Self {
            latitude,
            longitude,
            zoom,
            theme: Theme::default(),
            layout: Layout::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

/// Geometry of a render, computed without fetching anything.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    /// Coordinate after the latitude policy was applied.
    pub coordinate: GeoCoordinate,
    pub position: AbsolutePosition,
    pub center_tile: TileAddress,
    pub offset: SubTileOffset,
    pub grid: TileGrid,
    pub layout: Layout,
}

impl RenderPlan {
    /// Pixel in the output raster where the requested coordinate lands.
    ///
    /// The sub-tile shift moves the coordinate onto the north-west corner of
    /// the center cell, which is the raster center for even grids.
    pub fn coordinate_pixel(&self) -> (i64, i64) {
        let (row, col) = self.grid.center_cell();
        (
            col as i64 * self.layout.tile_size.width as i64,
            row as i64 * self.layout.tile_size.height as i64,
        )
    }
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub raster: CompositeRaster,
    pub position: AbsolutePosition,
    pub center_tile: TileAddress,
    pub offset: SubTileOffset,
    pub grid: TileGrid,
    pub coordinate_pixel: (i64, i64),
}

/// Renders maps from a [`TileSource`].
pub struct Renderer<S> {
    compositor: Compositor<S>,
    latitude_policy: LatitudePolicy,
    timeout: Option<Duration>,
}

impl<S: TileSource> Renderer<S> {
    /// Renderer with clamped latitudes and the default timeout.
    pub fn new(source: S) -> Self {
        Self {
            compositor: Compositor::new(source),
            latitude_policy: LatitudePolicy::default(),
            timeout: Some(DEFAULT_RENDER_TIMEOUT),
        }
    }

    pub fn with_latitude_policy(mut self, policy: LatitudePolicy) -> Self {
        self.latitude_policy = policy;
        self
    }

    /// Limit the duration of a whole render.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Maximum number of concurrent tile fetches.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.compositor = self.compositor.with_concurrency(concurrency);
        self
    }

    pub fn compositor(&self) -> &Compositor<S> {
        &self.compositor
    }

    pub fn latitude_policy(&self) -> LatitudePolicy {
        self.latitude_policy
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Validate a config and compute its geometry.
    pub fn plan(&self, config: &RenderConfig) -> Result<RenderPlan, RenderError> {
        let requested = GeoCoordinate::validated(config.latitude, config.longitude)?;
        let zoom = validate_zoom(config.zoom)
            .map_err(|e| RenderError::Configuration(e.to_string()))?;
        if !self.compositor.source().supports_zoom(zoom) {
            return Err(RenderError::Configuration(format!(
                "Zoom level {} is not available from the tile source",
                zoom
            )));
        }
        config.layout.validate()?;

        let coordinate = GeoCoordinate::new(
            self.latitude_policy.apply(requested.latitude),
            requested.longitude,
        );
        let position = project(coordinate.latitude, coordinate.longitude, zoom);
        // The offset is measured against the unwrapped tile so that a
        // position at longitude 180 keeps a zero offset after wrapping.
        let unwrapped = TileAddress::containing(&position)?;
        let offset = SubTileOffset::between(&position, &unwrapped, config.layout.tile_size);
        let center_tile = TileAddress::containing_on_world(&position)?;
        let grid = enumerate_grid(center_tile, config.layout.grid);

        debug!(
            x = position.x,
            y = position.y,
            center = %center_tile,
            dx = offset.dx,
            dy = offset.dy,
            "Planned render"
        );

        Ok(RenderPlan {
            coordinate,
            position,
            center_tile,
            offset,
            grid,
            layout: config.layout,
        })
    }

    /// Render a map, failing on the first tile that cannot be fetched.
    pub async fn render(&self, config: &RenderConfig) -> Result<RenderOutput, RenderError> {
        info!(
            latitude = config.latitude,
            longitude = config.longitude,
            zoom = config.zoom,
            theme = config.theme.name(),
            "Rendering map"
        );

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.render_untimed(config))
                .await
                .map_err(|_| RenderError::Timeout(limit))?,
            None => self.render_untimed(config).await,
        }
    }

    async fn render_untimed(&self, config: &RenderConfig) -> Result<RenderOutput, RenderError> {
        let plan = self.plan(config)?;

        let mut raster = self
            .compositor
            .compose_over(
                &plan.grid,
                plan.offset,
                plan.layout.tile_size,
                config.theme.background(),
            )
            .await?;

        let coordinate_pixel = plan.coordinate_pixel();
        if let Some(style) = config.theme.marker() {
            Marker::from_style(style).draw(&mut raster, coordinate_pixel.0, coordinate_pixel.1);
        }

        Ok(RenderOutput {
            raster,
            position: plan.position,
            center_tile: plan.center_tile,
            offset: plan.offset,
            grid: plan.grid,
            coordinate_pixel,
        })
    }
}

/// Renderer fetching tiles over HTTP.
pub type HttpRenderer = Renderer<HttpTileSource<AsyncReqwestClient>>;

impl HttpRenderer {
    /// Build a renderer for a configured provider.
    ///
    /// `request_timeout` bounds each tile download; the render timeout is set
    /// separately with [`Renderer::with_timeout`].
    pub fn for_provider(
        provider: &ProviderConfig,
        request_timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, RenderError> {
        let provider = provider
            .build()
            .map_err(|e| RenderError::Configuration(e.to_string()))?;
        let client = AsyncReqwestClient::with_options(request_timeout, user_agent)
            .map_err(|e| RenderError::Configuration(e.to_string()))?;
        Ok(Renderer::new(HttpTileSource::new(client, provider)))
    }
}
