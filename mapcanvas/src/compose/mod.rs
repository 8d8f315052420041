//! Raster compositing.
//!
//! The [`Compositor`] fetches every tile of a [`TileGrid`] concurrently and
//! draws them into a single [`CompositeRaster`]:
//!
//! ```text
//! TileGrid ──► normalize addresses ──► fetch (bounded, unordered)
//!                                          │
//!                       any failure ◄──────┤ all succeeded
//!                       abort compose      ▼
//!                                      draw at (c·w − dx, r·h − dy)
//!                                          │
//!                                          ▼
//!                                    CompositeRaster
//! ```
//!
//! Compositing is all-or-nothing. The first failed fetch aborts the call and
//! drops the remaining in-flight fetches; no partial raster is returned.
//! Cells whose row lies beyond the north or south edge of the world are not
//! fetched and keep the background color.

mod raster;

pub use raster::{CompositeRaster, RasterError};
pub(crate) use raster::composite_pixel;

use std::time::Instant;

use futures::{stream, StreamExt, TryStreamExt};
use image::{Rgba, RgbaImage};
use thiserror::Error;
use tracing::{debug, info};

use crate::coord::{SubTileOffset, TileAddress, TileSize};
use crate::grid::{GridCell, TileGrid};
use crate::source::{TileFetchError, TileSource};

/// Default number of tiles fetched concurrently.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Largest raster edge, in pixels, a composition may produce.
pub const MAX_RASTER_EDGE: u32 = 16384;

/// Default background color (light grey).
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([0xdd, 0xdd, 0xdd, 0xff]);

/// Errors that abort a composition.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A tile could not be fetched or decoded.
    #[error("Tile {address} failed: {source}")]
    TileFetch {
        address: TileAddress,
        #[source]
        source: TileFetchError,
    },

    /// Tile size has a zero dimension.
    #[error("Invalid tile size {width}×{height}")]
    InvalidTileSize { width: u32, height: u32 },

    /// Grid and tile size describe a raster beyond [`MAX_RASTER_EDGE`].
    #[error("Raster of {cols}×{rows} tiles at {tile_width}×{tile_height} px exceeds {max} px per side")]
    RasterTooLarge {
        rows: u32,
        cols: u32,
        tile_width: u32,
        tile_height: u32,
        max: u32,
    },
}

/// Draws grids of tiles from a [`TileSource`] into rasters.
#[derive(Debug, Clone)]
pub struct Compositor<S> {
    source: S,
    background: Rgba<u8>,
    concurrency: usize,
}

impl<S: TileSource> Compositor<S> {
    /// Create a compositor with the default background and concurrency.
    pub fn new(source: S) -> Self {
        Self {
            source,
            background: DEFAULT_BACKGROUND,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the background color the raster is pre-filled with.
    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    /// Set the maximum number of concurrent tile fetches (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Compose a grid into a raster of `cols·w × rows·h` pixels.
    ///
    /// Each cell at row `r`, column `c` is drawn at
    /// `(c·w − dx, r·h − dy)` where `(dx, dy)` is the sub-tile offset.
    pub async fn compose(
        &self,
        grid: &TileGrid,
        offset: SubTileOffset,
        tile_size: TileSize,
    ) -> Result<CompositeRaster, ComposeError> {
        self.compose_over(grid, offset, tile_size, self.background).await
    }

    /// Like [`compose`](Self::compose) with an explicit background color.
    pub async fn compose_over(
        &self,
        grid: &TileGrid,
        offset: SubTileOffset,
        tile_size: TileSize,
        background: Rgba<u8>,
    ) -> Result<CompositeRaster, ComposeError> {
        if tile_size.width == 0 || tile_size.height == 0 {
            return Err(ComposeError::InvalidTileSize {
                width: tile_size.width,
                height: tile_size.height,
            });
        }

        let (width, height) = grid
            .size()
            .checked_pixel_size(tile_size)
            .filter(|&(w, h)| w <= MAX_RASTER_EDGE && h <= MAX_RASTER_EDGE)
            .ok_or(ComposeError::RasterTooLarge {
                rows: grid.size().rows(),
                cols: grid.size().cols(),
                tile_width: tile_size.width,
                tile_height: tile_size.height,
                max: MAX_RASTER_EDGE,
            })?;

        let start = Instant::now();
        let mut raster = CompositeRaster::filled(width, height, background);

        let fetchable: Vec<(GridCell, TileAddress)> = grid
            .cells()
            .iter()
            .filter_map(|cell| cell.address.normalized().map(|address| (*cell, address)))
            .collect();
        let skipped = grid.len() - fetchable.len();

        let tiles: Vec<(GridCell, RgbaImage)> = stream::iter(fetchable)
            .map(|(cell, address)| self.fetch_cell(cell, address))
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        let (dx, dy) = offset.rounded();
        for (cell, tile) in &tiles {
            let (x, y) = cell.origin(tile_size);
            raster.draw_tile(tile, x - dx, y - dy, tile_size);
        }

        info!(
            center = %grid.center(),
            tiles = tiles.len(),
            skipped,
            width,
            height,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Composed map raster"
        );

        Ok(raster)
    }

    async fn fetch_cell(
        &self,
        cell: GridCell,
        address: TileAddress,
    ) -> Result<(GridCell, RgbaImage), ComposeError> {
        let tile = self
            .source
            .fetch_tile(&address)
            .await
            .map_err(|source| ComposeError::TileFetch { address, source })?;

        debug!(
            row = cell.row,
            col = cell.col,
            %address,
            "Fetched tile"
        );
        Ok((cell, tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{enumerate_grid, GridSize};
    use crate::source::tests::SolidTileSource;

    const TILE: [u8; 4] = [10, 120, 40, 255];
    const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn zero_offset() -> SubTileOffset {
        SubTileOffset { dx: 0.0, dy: 0.0 }
    }

    fn center() -> TileAddress {
        TileAddress::new(10, 10, 5)
    }

    #[tokio::test]
    async fn test_compose_covers_raster() {
        let compositor =
            Compositor::new(SolidTileSource::new(16, TILE)).with_background(BACKGROUND);
        let grid = enumerate_grid(center(), GridSize::default());

        let raster = compositor
            .compose(&grid, zero_offset(), TileSize::square(16))
            .await
            .unwrap();

        assert_eq!(raster.dimensions(), (64, 64));
        assert!(raster.image().pixels().all(|p| *p == Rgba(TILE)));
        assert_eq!(compositor.source().fetched().len(), 16);
    }

    #[tokio::test]
    async fn test_compose_fetches_every_grid_address() {
        let compositor = Compositor::new(SolidTileSource::new(8, TILE));
        let grid = enumerate_grid(center(), GridSize::new(3, 2).unwrap());

        compositor
            .compose(&grid, zero_offset(), TileSize::square(8))
            .await
            .unwrap();

        let mut fetched = compositor.source().fetched();
        fetched.sort_by_key(|a| (a.y, a.x));
        let expected: Vec<TileAddress> = grid.cells().iter().map(|c| c.address).collect();
        assert_eq!(fetched, expected);
    }

    #[tokio::test]
    async fn test_compose_applies_sub_tile_offset() {
        let compositor =
            Compositor::new(SolidTileSource::new(16, TILE)).with_background(BACKGROUND);
        let grid = enumerate_grid(center(), GridSize::default());
        let offset = SubTileOffset { dx: 4.0, dy: 8.0 };

        let raster = compositor
            .compose(&grid, offset, TileSize::square(16))
            .await
            .unwrap();

        // Tiles cover [0, 64 - dx) × [0, 64 - dy); the rest stays background.
        assert_eq!(raster.pixel(0, 0), Some(Rgba(TILE)));
        assert_eq!(raster.pixel(59, 55), Some(Rgba(TILE)));
        assert_eq!(raster.pixel(60, 0), Some(BACKGROUND));
        assert_eq!(raster.pixel(0, 56), Some(BACKGROUND));
    }

    #[tokio::test]
    async fn test_single_failure_fails_whole_composition() {
        let grid = enumerate_grid(center(), GridSize::default());

        for cell in grid.cells() {
            let source = SolidTileSource::new(8, TILE).failing_at(cell.address);
            let compositor = Compositor::new(source).with_concurrency(4);

            let result = compositor
                .compose(&grid, zero_offset(), TileSize::square(8))
                .await;

            match result {
                Err(ComposeError::TileFetch { address, .. }) => {
                    assert_eq!(address, cell.address)
                }
                other => panic!("Expected TileFetch error, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[tokio::test]
    async fn test_off_world_rows_keep_background() {
        let compositor =
            Compositor::new(SolidTileSource::new(8, TILE)).with_background(BACKGROUND);
        // Zoom 1 has rows 0..2; a 4-row window around row 0 reaches rows -2..2.
        let grid = enumerate_grid(TileAddress::new(0, 0, 1), GridSize::default());

        let raster = compositor
            .compose(&grid, zero_offset(), TileSize::square(8))
            .await
            .unwrap();

        assert_eq!(compositor.source().fetched().len(), 8);
        assert_eq!(raster.pixel(0, 0), Some(BACKGROUND));
        assert_eq!(raster.pixel(0, 15), Some(BACKGROUND));
        assert_eq!(raster.pixel(0, 16), Some(Rgba(TILE)));
        assert_eq!(raster.pixel(31, 31), Some(Rgba(TILE)));
    }

    #[tokio::test]
    async fn test_columns_wrap_around_antimeridian() {
        let compositor = Compositor::new(SolidTileSource::new(8, TILE));
        let grid = enumerate_grid(TileAddress::new(0, 1, 2), GridSize::new(1, 4).unwrap());

        compositor
            .compose(&grid, zero_offset(), TileSize::square(8))
            .await
            .unwrap();

        let mut columns: Vec<i64> = compositor.source().fetched().iter().map(|a| a.x).collect();
        columns.sort();
        assert_eq!(columns, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_zero_tile_size_rejected() {
        let compositor = Compositor::new(SolidTileSource::new(8, TILE));
        let grid = enumerate_grid(center(), GridSize::default());

        let result = compositor
            .compose(&grid, zero_offset(), TileSize::new(0, 256))
            .await;
        assert!(matches!(result, Err(ComposeError::InvalidTileSize { .. })));
    }

    #[test]
    fn test_concurrency_floor() {
        let compositor = Compositor::new(SolidTileSource::new(8, TILE)).with_concurrency(0);
        assert_eq!(compositor.concurrency(), 1);
    }

    #[tokio::test]
    async fn test_oversized_raster_rejected_before_fetching() {
        let compositor = Compositor::new(SolidTileSource::new(8, TILE));
        let grid = enumerate_grid(center(), GridSize::default());

        let result = compositor
            .compose(&grid, zero_offset(), TileSize::square(8192))
            .await;

        assert!(matches!(
            result,
            Err(ComposeError::RasterTooLarge { max: MAX_RASTER_EDGE, .. })
        ));
        assert!(compositor.source().fetched().is_empty());
    }
}
