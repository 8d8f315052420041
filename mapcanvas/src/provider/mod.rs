//! Tile provider abstraction
//!
//! This module provides traits and implementations for resolving tile
//! addresses to URLs on slippy-map tile servers, plus the HTTP client used to
//! download them.
//!
//! ```
//! use mapcanvas::provider::ProviderConfig;
//!
//! let provider = ProviderConfig::osm().build().unwrap();
//! assert_eq!(provider.name(), "OpenStreetMap");
//! ```

mod arcgis;
mod config;
mod http;
mod types;
mod xyz;

pub use arcgis::ArcGisProvider;
pub use config::ProviderConfig;
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use types::{ProviderError, TileProvider};
pub use xyz::{validate_template, XyzProvider, OSM_TEMPLATE};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
