//! ArcGIS World Imagery provider.
//!
//! Provides access to Esri's World Imagery basemap, which offers high-resolution
//! satellite and aerial imagery with global coverage.
//!
//! # URL Pattern
//!
//! `https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}`
//!
//! Note the row comes before the column, unlike the OpenStreetMap layout.
//! No authentication is required for the public tier.
//!
//! # Terms of Use
//!
//! The World Imagery basemap is provided by Esri and is subject to their
//! terms of use. See: <https://www.esri.com/en-us/legal/terms/full-master-agreement>

use crate::coord::TileAddress;
use crate::provider::TileProvider;

/// Base URL for ArcGIS World Imagery tiles.
const ARCGIS_BASE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile";

/// Minimum zoom level supported by ArcGIS World Imagery.
const MIN_ZOOM: u8 = 0;

/// Maximum zoom level supported by ArcGIS World Imagery.
const MAX_ZOOM: u8 = 19;

/// ArcGIS World Imagery satellite provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcGisProvider;

impl ArcGisProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TileProvider for ArcGisProvider {
    fn name(&self) -> &str {
        "ArcGIS"
    }

    fn min_zoom(&self) -> u8 {
        MIN_ZOOM
    }

    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }

    fn tile_url(&self, address: &TileAddress) -> String {
        format!("{}/{}/{}/{}", ARCGIS_BASE_URL, address.z, address.y, address.x)
    }
}
