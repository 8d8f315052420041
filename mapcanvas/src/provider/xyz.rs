//! Generic XYZ (slippy map) tile provider.
//!
//! Most public tile servers share the `/{z}/{x}/{y}.png` layout popularized
//! by OpenStreetMap. This provider expands a URL template:
//!
//! - `{z}` - zoom level
//! - `{x}` - column (0 to 2^zoom - 1, west to east)
//! - `{y}` - row (0 to 2^zoom - 1, north to south)
//! - `{s}` - optional subdomain, rotated across the configured list
//!
//! # Example
//!
//! ```
//! use mapcanvas::coord::TileAddress;
//! use mapcanvas::provider::{TileProvider, XyzProvider};
//!
//! let provider = XyzProvider::osm();
//! let url = provider.tile_url(&TileAddress::new(8, 5, 4));
//! assert_eq!(url, "https://tile.openstreetmap.org/4/8/5.png");
//! ```

use crate::coord::{TileAddress, MAX_ZOOM};
use crate::provider::{ProviderError, TileProvider};

/// OpenStreetMap standard tile layer.
pub const OSM_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Highest zoom served by the OpenStreetMap standard layer.
const OSM_MAX_ZOOM: u8 = 19;

/// Provider for any server following the XYZ URL convention.
#[derive(Debug, Clone)]
pub struct XyzProvider {
    name: String,
    template: String,
    subdomains: Vec<String>,
    min_zoom: u8,
    max_zoom: u8,
}

impl XyzProvider {
    /// Creates a provider from a URL template.
    ///
    /// The template must contain `{z}`, `{x}` and `{y}`. Templates using
    /// `{s}` get the subdomains `a`, `b`, `c` unless overridden with
    /// [`with_subdomains`](Self::with_subdomains).
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Result<Self, ProviderError> {
        let template = template.into();
        validate_template(&template)?;

        let subdomains = if template.contains("{s}") {
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        } else {
            Vec::new()
        };

        Ok(Self {
            name: name.into(),
            template,
            subdomains,
            min_zoom: 0,
            max_zoom: MAX_ZOOM,
        })
    }

    /// The OpenStreetMap standard tile layer.
    pub fn osm() -> Self {
        Self {
            name: "OpenStreetMap".to_string(),
            template: OSM_TEMPLATE.to_string(),
            subdomains: Vec::new(),
            min_zoom: 0,
            max_zoom: OSM_MAX_ZOOM,
        }
    }

    /// Replace the subdomains substituted for `{s}`.
    pub fn with_subdomains<I, S>(mut self, subdomains: I) -> Result<Self, ProviderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let subdomains: Vec<String> = subdomains.into_iter().map(Into::into).collect();
        if self.template.contains("{s}") && subdomains.is_empty() {
            return Err(ProviderError::InvalidTemplate {
                template: self.template.clone(),
                reason: "template uses {s} but no subdomains were given".to_string(),
            });
        }
        self.subdomains = subdomains;
        Ok(self)
    }

    /// Restrict the served zoom range.
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom.min(MAX_ZOOM);
        self.min_zoom = min_zoom.min(self.max_zoom);
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn subdomain_for(&self, address: &TileAddress) -> &str {
        if self.subdomains.is_empty() {
            return "";
        }
        let index = (address.x + address.y).rem_euclid(self.subdomains.len() as i64) as usize;
        &self.subdomains[index]
    }
}

impl TileProvider for XyzProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    fn tile_url(&self, address: &TileAddress) -> String {
        self.template
            .replace("{s}", self.subdomain_for(address))
            .replace("{z}", &address.z.to_string())
            .replace("{x}", &address.x.to_string())
            .replace("{y}", &address.y.to_string())
    }
}

/// Check that a template carries every required placeholder.
pub fn validate_template(template: &str) -> Result<(), ProviderError> {
    if !(template.starts_with("http://") || template.starts_with("https://")) {
        return Err(ProviderError::InvalidTemplate {
            template: template.to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }

    let missing: Vec<&str> = ["{z}", "{x}", "{y}"]
        .into_iter()
        .filter(|placeholder| !template.contains(placeholder))
        .collect();

    if !missing.is_empty() {
        return Err(ProviderError::InvalidTemplate {
            template: template.to_string(),
            reason: format!("missing placeholder(s) {}", missing.join(", ")),
        });
    }

    Ok(())
}
