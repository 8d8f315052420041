//! Tile grid enumeration.
//!
//! A [`TileGrid`] is the rectangular window of tile addresses surrounding the
//! tile that contains the requested coordinate. The window spans
//! `[-floor(n/2), ceil(n/2))` tiles on each axis, so odd sizes are exactly
//! centered and even sizes carry one extra cell on the negative side:
//!
//! ```text
//! cols = 4, center x = 10      cols = 5, center x = 10
//!
//!   8   9  [10]  11              8   9  [10]  11  12
//! ```
//!
//! Cells are emitted in row-major order (top-to-bottom, then left-to-right).

use serde::Serialize;
use std::fmt;

use crate::coord::{TileAddress, TileSize};

/// Default number of rows and columns in a grid.
pub const DEFAULT_GRID_DIMENSION: u32 = 4;

/// Errors for invalid grid configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A grid needs at least one row and one column.
    EmptyGrid { rows: u32, cols: u32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::EmptyGrid { rows, cols } => write!(
                f,
                "Grid must have at least one row and column, got {}×{}",
                rows, cols
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Number of rows and columns in a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSize {
    rows: u32,
    cols: u32,
}

impl GridSize {
    /// Create a grid size, rejecting zero dimensions.
    pub fn new(rows: u32, cols: u32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Square grid.
    pub fn square(n: u32) -> Result<Self, GridError> {
        Self::new(n, n)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Raster dimensions at the given tile size, or `None` if either side
    /// overflows `u32`.
    pub fn checked_pixel_size(&self, tile_size: TileSize) -> Option<(u32, u32)> {
        Some((
            self.cols.checked_mul(tile_size.width)?,
            self.rows.checked_mul(tile_size.height)?,
        ))
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_DIMENSION,
            cols: DEFAULT_GRID_DIMENSION,
        }
    }
}

/// Tile offsets covered along one axis of `n` cells.
///
/// Returns the half-open range `[-floor(n/2), ceil(n/2))`.
#[inline]
pub fn axis_offsets(n: u32) -> std::ops::Range<i64> {
    let n = n as i64;
    let before = n / 2;
    let after = n - before;
    -before..after
}

/// One cell of a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell {
    /// Row index within the grid (0 = top).
    pub row: u32,
    /// Column index within the grid (0 = left).
    pub col: u32,
    /// Tile address drawn in this cell.
    pub address: TileAddress,
}

impl GridCell {
    /// Pixel position of the cell's north-west corner before the sub-tile
    /// shift is applied.
    pub fn origin(&self, tile_size: TileSize) -> (i64, i64) {
        (
            self.col as i64 * tile_size.width as i64,
            self.row as i64 * tile_size.height as i64,
        )
    }
}

/// Ordered window of tile addresses centered on one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileGrid {
    center: TileAddress,
    size: GridSize,
    cells: Vec<GridCell>,
}

impl TileGrid {
    /// The tile containing the requested coordinate.
    pub fn center(&self) -> TileAddress {
        self.center
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at the given row and column.
    pub fn cell(&self, row: u32, col: u32) -> Option<&GridCell> {
        if row >= self.size.rows || col >= self.size.cols {
            return None;
        }
        self.cells.get((row * self.size.cols + col) as usize)
    }

    /// Row and column of the center tile within the grid.
    pub fn center_cell(&self) -> (u32, u32) {
        (self.size.rows / 2, self.size.cols / 2)
    }

    /// Output raster dimensions for this grid at the given tile size.
    ///
    /// Saturates at `u32::MAX`; see [`GridSize::checked_pixel_size`].
    pub fn pixel_size(&self, tile_size: TileSize) -> (u32, u32) {
        (
            self.size.cols.saturating_mul(tile_size.width),
            self.size.rows.saturating_mul(tile_size.height),
        )
    }

    /// Distinct column addresses, left to right.
    pub fn columns(&self) -> Vec<i64> {
        self.cells
            .iter()
            .take(self.size.cols as usize)
            .map(|cell| cell.address.x)
            .collect()
    }

    /// Distinct row addresses, top to bottom.
    pub fn rows(&self) -> Vec<i64> {
        self.cells
            .iter()
            .step_by(self.size.cols as usize)
            .map(|cell| cell.address.y)
            .collect()
    }
}

/// Enumerate the grid of tile addresses surrounding `center`.
pub fn enumerate_grid(center: TileAddress, size: GridSize) -> TileGrid {
    let mut cells = Vec::with_capacity(size.cell_count());

    for (row, dy) in axis_offsets(size.rows).enumerate() {
        for (col, dx) in axis_offsets(size.cols).enumerate() {
            cells.push(GridCell {
                row: row as u32,
                col: col as u32,
                address: center.offset(dx, dy),
            });
        }
    }

    TileGrid {
        center,
        size,
        cells,
    }
}
