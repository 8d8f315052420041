//! mapcanvas - static maps from slippy-map raster tiles
//!
//! This library renders a map image centered on a geographic coordinate. The
//! coordinate is projected with Web Mercator, the surrounding tiles are
//! fetched concurrently from a tile server and composed into one raster.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use mapcanvas::provider::{ProviderConfig, DEFAULT_USER_AGENT};
//! use mapcanvas::render::{HttpRenderer, RenderConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let renderer = HttpRenderer::for_provider(
//!     &ProviderConfig::osm(),
//!     Duration::from_secs(30),
//!     DEFAULT_USER_AGENT,
//! )?;
//!
//! let output = renderer.render(&RenderConfig::new(48.8566, 2.3522, 14)).await?;
//! output.raster.save("paris.png")?;
//! # Ok(())
//! # }
//! ```

pub mod compose;
pub mod config;
pub mod coord;
pub mod grid;
pub mod logging;
pub mod provider;
pub mod render;
pub mod source;

pub use compose::{CompositeRaster, Compositor};
pub use coord::{project, AbsolutePosition, TileAddress};
pub use grid::{enumerate_grid, GridSize, TileGrid};
pub use render::{RenderConfig, RenderError, RenderOutput, Renderer};
pub use source::TileSource;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
