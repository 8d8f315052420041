//! Tile sources: turn a tile address into a decoded image.
//!
//! The compositor only depends on the [`TileSource`] trait. The production
//! implementation, [`HttpTileSource`], resolves the address to a URL through a
//! [`TileProvider`], downloads it with an [`AsyncHttpClient`] and decodes the
//! body with the `image` crate.

use std::future::Future;
use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;
use tracing::trace;

use crate::coord::TileAddress;
use crate::provider::{AsyncHttpClient, ProviderError, TileProvider};

/// Errors raised while fetching or decoding a single tile.
#[derive(Debug, Error)]
pub enum TileFetchError {
    /// The provider cannot serve the address (e.g. unsupported zoom).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Network failure or non-success HTTP status.
    #[error("Failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: ProviderError,
    },

    /// The response body is not a decodable image.
    #[error("Failed to decode tile from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Capability to fetch and decode one tile image.
pub trait TileSource: Send + Sync {
    /// Fetch the tile at `address` as an RGBA image.
    fn fetch_tile(
        &self,
        address: &TileAddress,
    ) -> impl Future<Output = Result<RgbaImage, TileFetchError>> + Send;

    /// URL the tile would be fetched from, if the source is URL based.
    fn tile_url(&self, _address: &TileAddress) -> Option<String> {
        None
    }

    /// Whether tiles exist at this zoom level.
    fn supports_zoom(&self, _zoom: u8) -> bool {
        true
    }
}

/// Tile source backed by an HTTP tile server.
pub struct HttpTileSource<C: AsyncHttpClient> {
    client: C,
    provider: Arc<dyn TileProvider>,
}

impl<C: AsyncHttpClient> HttpTileSource<C> {
    pub fn new(client: C, provider: Arc<dyn TileProvider>) -> Self {
        Self { client, provider }
    }

    pub fn provider(&self) -> &dyn TileProvider {
        self.provider.as_ref()
    }
}

impl<C: AsyncHttpClient> TileSource for HttpTileSource<C> {
    async fn fetch_tile(&self, address: &TileAddress) -> Result<RgbaImage, TileFetchError> {
        if !self.provider.supports_zoom(address.z) {
            return Err(ProviderError::UnsupportedZoom(address.z).into());
        }

        let url = self.provider.tile_url(address);
        trace!(%address, url = %url, "Fetching tile");

        let body = self
            .client
            .get(&url)
            .await
            .map_err(|source| TileFetchError::Download {
                url: url.clone(),
                source,
            })?;

        decode_tile(&url, body.to_vec()).await
    }

    fn tile_url(&self, address: &TileAddress) -> Option<String> {
        Some(self.provider.tile_url(address))
    }

    fn supports_zoom(&self, zoom: u8) -> bool {
        self.provider.supports_zoom(zoom)
    }
}

/// Decode an encoded tile image off the async runtime.
async fn decode_tile(url: &str, body: Vec<u8>) -> Result<RgbaImage, TileFetchError> {
    let decoded = tokio::task::spawn_blocking(move || {
        image::load_from_memory(&body).map(|image| image.to_rgba8())
    })
    .await
    .map_err(|e| TileFetchError::Decode {
        url: url.to_string(),
        message: format!("decode task failed: {}", e),
    })?;

    decoded.map_err(|e| TileFetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::provider::{MockAsyncHttpClient, XyzProvider};
    use image::{ImageFormat, Rgba};
    use std::collections::HashSet;
    use std::io::Cursor;
    use std::sync::Mutex;

    /// Encode a solid-color PNG of the given size.
    pub fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    /// In-memory tile source returning solid tiles, failing for selected
    /// addresses.
    pub struct SolidTileSource {
        pub size: (u32, u32),
        pub color: [u8; 4],
        pub failing: HashSet<TileAddress>,
        pub fetched: Mutex<Vec<TileAddress>>,
    }

    impl SolidTileSource {
        pub fn new(size: u32, color: [u8; 4]) -> Self {
            Self {
                size: (size, size),
                color,
                failing: HashSet::new(),
                fetched: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_at(mut self, address: TileAddress) -> Self {
            self.failing.insert(address);
            self
        }

        pub fn fetched(&self) -> Vec<TileAddress> {
            self.fetched.lock().unwrap().clone()
        }
    }

    impl TileSource for SolidTileSource {
        async fn fetch_tile(&self, address: &TileAddress) -> Result<RgbaImage, TileFetchError> {
            self.fetched.lock().unwrap().push(*address);
            if self.failing.contains(address) {
                return Err(TileFetchError::Download {
                    url: address.to_string(),
                    source: ProviderError::HttpStatus {
                        status: 503,
                        url: address.to_string(),
                    },
                });
            }
            Ok(RgbaImage::from_pixel(self.size.0, self.size.1, Rgba(self.color)))
        }
    }

    fn osm_source(client: MockAsyncHttpClient) -> HttpTileSource<MockAsyncHttpClient> {
        HttpTileSource::new(client, Arc::new(XyzProvider::osm()))
    }

    #[tokio::test]
    async fn test_fetch_decodes_png() {
        let source = osm_source(MockAsyncHttpClient::ok(solid_png(4, 4, [10, 20, 30, 255])));

        let tile = source.fetch_tile(&TileAddress::new(1, 2, 3)).await.unwrap();
        assert_eq!(tile.dimensions(), (4, 4));
        assert_eq!(tile.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[tokio::test]
    async fn test_fetch_requests_provider_url() {
        let source = osm_source(MockAsyncHttpClient::ok(solid_png(1, 1, [0, 0, 0, 255])));

        source.fetch_tile(&TileAddress::new(5, 6, 7)).await.unwrap();
        assert_eq!(
            source.client.requested_urls(),
            vec!["https://tile.openstreetmap.org/7/5/6.png".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_unsupported_zoom() {
        let source = osm_source(MockAsyncHttpClient::ok(solid_png(1, 1, [0, 0, 0, 255])));

        let result = source.fetch_tile(&TileAddress::new(0, 0, 21)).await;
        assert!(matches!(
            result,
            Err(TileFetchError::Provider(ProviderError::UnsupportedZoom(21)))
        ));
        assert!(source.client.requested_urls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_network_error() {
        let source = osm_source(MockAsyncHttpClient::err(ProviderError::HttpError(
            "Connection refused".to_string(),
        )));

        let result = source.fetch_tile(&TileAddress::new(1, 1, 2)).await;
        match result {
            Err(TileFetchError::Download { url, source }) => {
                assert_eq!(url, "https://tile.openstreetmap.org/2/1/1.png");
                assert!(source.to_string().contains("Connection refused"));
            }
            other => panic!("Expected Download error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_invalid_image() {
        let source = osm_source(MockAsyncHttpClient::ok(vec![0xFFu8, 0xD8, 0x00]));

        let result = source.fetch_tile(&TileAddress::new(1, 1, 2)).await;
        assert!(matches!(result, Err(TileFetchError::Decode { .. })));
    }

    #[test]
    fn test_supports_zoom_follows_provider() {
        let source = osm_source(MockAsyncHttpClient::ok(Vec::<u8>::new()));
        assert!(source.supports_zoom(19));
        assert!(!source.supports_zoom(20));
    }

    #[test]
    fn test_tile_url_exposed() {
        let source = osm_source(MockAsyncHttpClient::ok(Vec::<u8>::new()));
        assert_eq!(
            source.tile_url(&TileAddress::new(0, 0, 0)).as_deref(),
            Some("https://tile.openstreetmap.org/0/0/0.png")
        );
    }
}
