//! Provider trait and error types.

use thiserror::Error;

use crate::coord::TileAddress;

/// Errors raised while resolving or downloading tiles from a provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport-level failure (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Requested zoom level is outside the provider's range.
    #[error("Unsupported zoom level: {0}")]
    UnsupportedZoom(u8),

    /// URL template is missing required placeholders or is malformed.
    #[error("Invalid URL template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },
}

/// Source of tile URLs for a slippy-map tile server.
///
/// Implementations only map addresses to URLs; downloading is handled by an
/// [`AsyncHttpClient`](super::AsyncHttpClient). Addresses passed to
/// [`tile_url`](TileProvider::tile_url) are expected to be normalized onto
/// the world (see [`TileAddress::normalized`]).
pub trait TileProvider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Lowest zoom level served.
    fn min_zoom(&self) -> u8;

    /// Highest zoom level served.
    fn max_zoom(&self) -> u8;

    /// Whether the provider serves tiles at `zoom`.
    fn supports_zoom(&self, zoom: u8) -> bool {
        (self.min_zoom()..=self.max_zoom()).contains(&zoom)
    }

    /// Build the URL for a tile.
    fn tile_url(&self, address: &TileAddress) -> String;
}
