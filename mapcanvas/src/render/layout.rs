//! Output layout: grid dimensions and tile pixel size.

use serde::Serialize;

use crate::compose::MAX_RASTER_EDGE;
use crate::coord::TileSize;
use crate::grid::{GridError, GridSize};

/// Shape of the rendered map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Layout {
    pub grid: GridSize,
    pub tile_size: TileSize,
}

/// Errors for layouts that cannot produce a raster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Tile size must be non-zero, got {width}×{height}")]
    ZeroTileSize { width: u32, height: u32 },

    #[error("Layout of {cols}×{rows} tiles at {tile_width}×{tile_height} px exceeds {max} px per side")]
    TooLarge {
        rows: u32,
        cols: u32,
        tile_width: u32,
        tile_height: u32,
        max: u32,
    },
}

impl Layout {
    /// Create a layout of `rows × cols` tiles of `tile_size` pixels.
    pub fn new(rows: u32, cols: u32, tile_size: TileSize) -> Result<Self, LayoutError> {
        let grid = GridSize::new(rows, cols)?;
        let layout = Self { grid, tile_size };
        layout.validate()?;
        Ok(layout)
    }

    /// Reject zero tile dimensions and rasters wider or taller than
    /// [`MAX_RASTER_EDGE`].
    ///
    /// [`GridSize`] already guarantees at least one row and column.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.tile_size.width == 0 || self.tile_size.height == 0 {
            return Err(LayoutError::ZeroTileSize {
                width: self.tile_size.width,
                height: self.tile_size.height,
            });
        }

        match self.grid.checked_pixel_size(self.tile_size) {
            Some((width, height)) if width <= MAX_RASTER_EDGE && height <= MAX_RASTER_EDGE => {
                Ok(())
            }
            _ => Err(LayoutError::TooLarge {
                rows: self.grid.rows(),
                cols: self.grid.cols(),
                tile_width: self.tile_size.width,
                tile_height: self.tile_size.height,
                max: MAX_RASTER_EDGE,
            }),
        }
    }

    /// Output raster dimensions in pixels, saturating for unvalidated layouts.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.grid.cols().saturating_mul(self.tile_size.width),
            self.grid.rows().saturating_mul(self.tile_size.height),
        )
    }
}
