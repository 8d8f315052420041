//! Coordinate types for Web Mercator projection and tile addressing.

use serde::Serialize;
use std::fmt;

/// Maximum latitude representable in Web Mercator (degrees).
pub const MAX_LAT: f64 = 85.0511287798;

/// Minimum latitude representable in Web Mercator (degrees).
pub const MIN_LAT: f64 = -85.0511287798;

/// Minimum longitude (degrees).
pub const MIN_LON: f64 = -180.0;

/// Maximum longitude (degrees).
pub const MAX_LON: f64 = 180.0;

/// Minimum supported zoom level.
pub const MIN_ZOOM: u8 = 0;

/// Maximum supported zoom level.
///
/// Tile servers rarely go beyond 22; the bound keeps `2^zoom` well inside
/// the integer range used by [`TileAddress`].
pub const MAX_ZOOM: u8 = 22;

/// Errors produced while validating coordinates or converting positions.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude outside [-90, 90] or not a finite number.
    InvalidLatitude(f64),
    /// Longitude outside [-180, 180] or not a finite number.
    InvalidLongitude(f64),
    /// Zoom level above [`MAX_ZOOM`].
    InvalidZoom(u8),
    /// A projected position is NaN or infinite (e.g. latitude at a pole).
    NonFinitePosition { x: f64, y: f64 },
    /// A projected position lies north or south of the world map.
    OffWorld { x: f64, y: f64 },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(f, "Invalid latitude {} (expected -90..=90)", lat)
            }
            CoordError::InvalidLongitude(lon) => {
                write!(f, "Invalid longitude {} (expected -180..=180)", lon)
            }
            CoordError::InvalidZoom(zoom) => {
                write!(f, "Invalid zoom level {} (expected 0..={})", zoom, MAX_ZOOM)
            }
            CoordError::NonFinitePosition { x, y } => {
                write!(f, "Projected position ({}, {}) is not finite", x, y)
            }
            CoordError::OffWorld { x, y } => {
                write!(f, "Projected position ({}, {}) lies outside the world map", x, y)
            }
        }
    }
}

impl std::error::Error for CoordError {}

/// How latitudes beyond the Web Mercator limit are treated before projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LatitudePolicy {
    /// Clamp to [`MIN_LAT`, `MAX_LAT`].
    #[default]
    Clamp,
    /// Project as given; poles produce non-finite positions.
    Propagate,
}

impl LatitudePolicy {
    /// Apply the policy to a latitude in degrees.
    pub fn apply(self, lat: f64) -> f64 {
        match self {
            LatitudePolicy::Clamp => super::clamp_latitude(lat),
            LatitudePolicy::Propagate => lat,
        }
    }

    /// Parse from a configuration string.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clamp" => Some(LatitudePolicy::Clamp),
            "propagate" => Some(LatitudePolicy::Propagate),
            _ => None,
        }
    }

    /// Name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            LatitudePolicy::Clamp => "clamp",
            LatitudePolicy::Propagate => "propagate",
        }
    }
}

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Creates a coordinate without validation.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Fractional position within the whole world map, independent of zoom.
///
/// Both components lie in `[0, 1)` for coordinates inside the Web Mercator
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelativePosition {
    pub x: f64,
    pub y: f64,
}

impl RelativePosition {
    /// Scale into tile units at the given zoom level.
    #[inline]
    pub fn at_zoom(self, zoom: u8) -> AbsolutePosition {
        let n = 2.0_f64.powi(zoom as i32);
        AbsolutePosition {
            x: self.x * n,
            y: self.y * n,
            zoom,
        }
    }
}

/// Position in tile units at a zoom level, each component in `[0, 2^zoom)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbsolutePosition {
    pub x: f64,
    pub y: f64,
    pub zoom: u8,
}

impl AbsolutePosition {
    /// Whether both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Address of one raster tile in the XYZ scheme.
///
/// Columns increase eastward and rows increase southward. Components are
/// signed so grid windows near the map edge can address neighbours outside
/// the world; see [`TileAddress::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileAddress {
    pub x: i64,
    pub y: i64,
    pub z: u8,
}

impl TileAddress {
    pub fn new(x: i64, y: i64, z: u8) -> Self {
        Self { x, y, z }
    }

    /// The tile containing an absolute position.
    ///
    /// Components are floored. Non-finite positions are rejected rather than
    /// saturated into a bogus address.
    pub fn containing(position: &AbsolutePosition) -> Result<Self, CoordError> {
        if !position.is_finite() {
            return Err(CoordError::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }
        Ok(Self {
            x: position.x.floor() as i64,
            y: position.y.floor() as i64,
            z: position.zoom,
        })
    }

    /// Number of tiles per axis at this address's zoom level.
    #[inline]
    pub fn tiles_per_axis(&self) -> i64 {
        1_i64 << self.z
    }

    /// Whether the address lies inside `[0, 2^z)` on both axes.
    pub fn is_within_world(&self) -> bool {
        let n = self.tiles_per_axis();
        (0..n).contains(&self.x) && (0..n).contains(&self.y)
    }

    /// Map the address onto the world.
    ///
    /// Columns wrap around the antimeridian. Rows above the north edge or
    /// below the south edge have no tile and yield `None`.
    pub fn normalized(&self) -> Option<Self> {
        let n = self.tiles_per_axis();
        if !(0..n).contains(&self.y) {
            return None;
        }
        Some(Self {
            x: self.x.rem_euclid(n),
            y: self.y,
            z: self.z,
        })
    }

    /// The on-world tile containing an absolute position.
    ///
    /// Like [`containing`](Self::containing), but wraps the column around the
    /// antimeridian (longitude 180 maps to column 0) and rejects rows outside
    /// the world.
    pub fn containing_on_world(position: &AbsolutePosition) -> Result<Self, CoordError> {
        Self::containing(position)?
            .normalized()
            .ok_or(CoordError::OffWorld {
                x: position.x,
                y: position.y,
            })
    }

    /// Address offset by whole tiles.
    pub fn offset(&self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Pixel dimensions of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileSize {
    pub width: u32,
    pub height: u32,
}

impl TileSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Square tile of the given edge length.
    pub const fn square(edge: u32) -> Self {
        Self {
            width: edge,
            height: edge,
        }
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self::square(256)
    }
}

/// Pixel delta between an exact position and the corner of its tile.
///
/// The composed grid is shifted by this amount so that the requested
/// coordinate lands at the visual center of the output raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubTileOffset {
    pub dx: f64,
    pub dy: f64,
}

impl SubTileOffset {
    /// Offset of `position` from the north-west corner of `tile`, in pixels.
    pub fn between(position: &AbsolutePosition, tile: &TileAddress, size: TileSize) -> Self {
        Self {
            dx: (position.x - tile.x as f64) * size.width as f64,
            dy: (position.y - tile.y as f64) * size.height as f64,
        }
    }

    /// Offset rounded to whole pixels for drawing.
    pub fn rounded(&self) -> (i64, i64) {
        (self.dx.round() as i64, self.dy.round() as i64)
    }
}
