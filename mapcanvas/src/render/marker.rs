//! Center marker overlay.
//!
//! A [`Marker`] is built from a [`MarkerStyle`] for each render; nothing is
//! shared between renders.

use crate::compose::{composite_pixel, CompositeRaster};
use crate::render::theme::MarkerStyle;

/// Filled circle with an outline, drawn at a pixel position.
#[derive(Debug, Clone)]
pub struct Marker {
    style: MarkerStyle,
}

impl Marker {
    pub fn from_style(style: &MarkerStyle) -> Self {
        Self { style: *style }
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    /// Draw the marker centered on `(cx, cy)`, clipped to the raster.
    pub fn draw(&self, raster: &mut CompositeRaster, cx: i64, cy: i64) {
        let radius = self.style.radius as f64;
        let inner = radius - self.style.outline_width as f64;
        let r = self.style.radius as i64;
        let (width, height) = raster.dimensions();
        let image = raster.image_mut();

        for y in (cy - r).max(0)..(cy + r).min(height as i64) {
            for x in (cx - r).max(0)..(cx + r).min(width as i64) {
                let distance = distance_to_center(x, y, cx, cy);
                let color = if distance <= inner {
                    self.style.fill
                } else if distance <= radius {
                    self.style.outline
                } else {
                    continue;
                };
                composite_pixel(image.get_pixel_mut(x as u32, y as u32), color);
            }
        }
    }
}

/// Distance from the center of pixel `(x, y)` to the marker center.
fn distance_to_center(x: i64, y: i64, cx: i64, cy: i64) -> f64 {
    let dx = x as f64 + 0.5 - cx as f64;
    let dy = y as f64 + 0.5 - cy as f64;
    (dx * dx + dy * dy).sqrt()
}
