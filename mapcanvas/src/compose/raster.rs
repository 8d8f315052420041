//! Output raster surface.

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Pixel, Rgba, RgbaImage};
use thiserror::Error;

use crate::coord::TileSize;

/// Errors raised while encoding or saving a raster.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Composed map image.
///
/// The surface is pre-filled with a solid background color, so any area not
/// covered by a tile has a deterministic value rather than transparency.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRaster {
    image: RgbaImage,
}

impl CompositeRaster {
    /// Create a raster filled with `background`.
    pub fn filled(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Draw a tile with its north-west corner at `(x, y)`.
    ///
    /// Tiles are clipped at the raster edges and composited over the
    /// background. Tiles whose size differs from `size` are resampled first.
    pub fn draw_tile(&mut self, tile: &RgbaImage, x: i64, y: i64, size: TileSize) {
        let resized;
        let tile = if tile.dimensions() == (size.width, size.height) {
            tile
        } else {
            resized = imageops::resize(tile, size.width, size.height, FilterType::Triangle);
            &resized
        };

        let (width, height) = self.dimensions();
        let x_end = (x + tile.width() as i64).min(width as i64);
        let y_end = (y + tile.height() as i64).min(height as i64);

        for py in y.max(0)..y_end {
            for px in x.max(0)..x_end {
                let source = *tile.get_pixel((px - x) as u32, (py - y) as u32);
                composite_pixel(self.image.get_pixel_mut(px as u32, py as u32), source);
            }
        }
    }

    /// Encode the raster as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }

    /// Save the raster; the format is chosen from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RasterError> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Composite `source` over `target`.
///
/// Opaque pixels replace the target and fully transparent pixels leave it
/// untouched; everything else is alpha-blended.
pub(crate) fn composite_pixel(target: &mut Rgba<u8>, source: Rgba<u8>) {
    match source[3] {
        0 => {}
        255 => *target = source,
        _ => target.blend(&source),
    }
}
