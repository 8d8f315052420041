//! Provider selection and construction.

use std::sync::Arc;

use crate::coord::MAX_ZOOM;
use crate::provider::{ArcGisProvider, ProviderError, TileProvider, XyzProvider};

/// Which tile server to render from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProviderConfig {
    /// OpenStreetMap standard layer.
    #[default]
    Osm,
    /// Esri World Imagery.
    ArcGis,
    /// Any XYZ server described by a URL template.
    Custom {
        name: String,
        template: String,
        max_zoom: u8,
    },
}

impl ProviderConfig {
    pub fn osm() -> Self {
        ProviderConfig::Osm
    }

    pub fn arcgis() -> Self {
        ProviderConfig::ArcGis
    }

    /// Custom XYZ template with the full zoom range.
    pub fn custom(template: impl Into<String>) -> Self {
        ProviderConfig::Custom {
            name: "Custom".to_string(),
            template: template.into(),
            max_zoom: MAX_ZOOM,
        }
    }

    /// Display name of the configured provider.
    pub fn name(&self) -> &str {
        match self {
            ProviderConfig::Osm => "OpenStreetMap",
            ProviderConfig::ArcGis => "ArcGIS",
            ProviderConfig::Custom { name, .. } => name,
        }
    }

    /// Short identifier used in configuration files.
    pub fn type_str(&self) -> &'static str {
        match self {
            ProviderConfig::Osm => "osm",
            ProviderConfig::ArcGis => "arcgis",
            ProviderConfig::Custom { .. } => "custom",
        }
    }

    /// Construct the provider.
    pub fn build(&self) -> Result<Arc<dyn TileProvider>, ProviderError> {
        let provider: Arc<dyn TileProvider> = match self {
            ProviderConfig::Osm => Arc::new(XyzProvider::osm()),
            ProviderConfig::ArcGis => Arc::new(ArcGisProvider::new()),
            ProviderConfig::Custom {
                name,
                template,
                max_zoom,
            } => Arc::new(
                XyzProvider::new(name.clone(), template.clone())?.with_zoom_range(0, *max_zoom),
            ),
        };
        Ok(provider)
    }
}
