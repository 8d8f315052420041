//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator positions and tile addresses used by slippy-map tile
//! servers.
//!
//! # Example
//!
//! ```
//! use mapcanvas::coord::{project, TileAddress};
//!
//! let position = project(0.0, 0.0, 4);
//! assert_eq!(position.x, 8.0);
//! assert_eq!(position.y, 8.0);
//!
//! let tile = TileAddress::containing(&position).unwrap();
//! assert_eq!((tile.x, tile.y, tile.z), (8, 8, 4));
//! ```

mod types;

pub use types::{
    AbsolutePosition, CoordError, GeoCoordinate, LatitudePolicy, RelativePosition, SubTileOffset,
    TileAddress, TileSize, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Projects a coordinate onto the unit square of the Web Mercator world map.
///
/// `x = (lon + 180) / 360` and `y = (1 - ln(tan(lat) + sec(lat)) / pi) / 2`.
/// No clamping is applied: latitudes of ±90° land outside the map or produce
/// non-finite values.
#[inline]
pub fn relative_position(lat: f64, lon: f64) -> RelativePosition {
    let lat_rad = lat.to_radians();
    let x = (lon + 180.0) / 360.0;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    RelativePosition { x, y }
}

/// Projects a coordinate into tile units at the given zoom level.
///
/// This is a pure function of its inputs. Callers that do not want
/// off-world or non-finite positions at the poles must clamp the latitude first (see
/// [`clamp_latitude`] and [`LatitudePolicy`]).
///
/// # Arguments
///
/// * `lat` - Latitude in degrees
/// * `lon` - Longitude in degrees
/// * `zoom` - Zoom level; the world spans `2^zoom` tiles per axis
#[inline]
pub fn project(lat: f64, lon: f64, zoom: u8) -> AbsolutePosition {
    relative_position(lat, lon).at_zoom(zoom)
}

/// Clamps a latitude into the range Web Mercator can represent.
#[inline]
pub fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(MIN_LAT, MAX_LAT)
}

/// Validates a zoom level against [`MAX_ZOOM`].
pub fn validate_zoom(zoom: u8) -> Result<u8, CoordError> {
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }
    Ok(zoom)
}

/// Converts a tile address back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileAddress) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.z as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;

    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad.to_degrees();

    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_world_center() {
        for zoom in 0..=MAX_ZOOM {
            let position = project(0.0, 0.0, zoom);
            let half = 2.0_f64.powi(zoom as i32) / 2.0;
            assert_eq!(position.x, half);
            assert_eq!(position.y, half);
        }
    }

    #[test]
    fn test_new_york_city_at_zoom_16() {
        let position = project(40.7128, -74.0060, 16);
        let tile = TileAddress::containing(&position).unwrap();
        assert_eq!(tile.x, 19295);
        assert_eq!(tile.y, 24640);
        assert_eq!(tile.z, 16);
    }

    #[test]
    fn test_relative_position_corners() {
        let west = relative_position(0.0, -180.0);
        assert_eq!(west.x, 0.0);

        let north = relative_position(MAX_LAT, 0.0);
        assert!(north.y.abs() < 1e-8, "north edge should be ~0, got {}", north.y);

        let south = relative_position(MIN_LAT, 0.0);
        assert!((south.y - 1.0).abs() < 1e-8, "south edge should be ~1, got {}", south.y);
    }

    #[test]
    fn test_unclamped_poles_leave_the_world() {
        // tan + sec underflows to zero at the south pole.
        let south = project(-90.0, 0.0, 10);
        assert!(!south.is_finite());
        assert!(matches!(
            TileAddress::containing(&south),
            Err(CoordError::NonFinitePosition { .. })
        ));

        // At the north pole cos(pi/2) is not exactly zero, so the result is
        // finite but far above the top edge.
        let north = project(90.0, 0.0, 10);
        assert!(north.y < 0.0);
        assert!(matches!(
            TileAddress::containing_on_world(&north),
            Err(CoordError::OffWorld { .. })
        ));
    }

    #[test]
    fn test_containing_on_world_wraps_antimeridian() {
        let tile = TileAddress::containing_on_world(&project(0.0, 180.0, 2)).unwrap();
        assert_eq!(tile, TileAddress::new(0, 2, 2));
    }

    #[test]
    fn test_clamped_pole_is_finite() {
        let lat = LatitudePolicy::Clamp.apply(90.0);
        assert_eq!(lat, MAX_LAT);

        let position = project(lat, 0.0, 10);
        assert!(position.is_finite());
        let tile = TileAddress::containing(&position).unwrap();
        assert_eq!(tile.y, 0);
    }

    #[test]
    fn test_clamped_south_pole_stays_on_last_row() {
        let lat = LatitudePolicy::Clamp.apply(-90.0);
        assert_eq!(lat, MIN_LAT);

        let position = project(lat, 0.0, MAX_ZOOM);
        assert!(position.y < 2.0_f64.powi(MAX_ZOOM as i32));
        let tile = TileAddress::containing_on_world(&position).unwrap();
        assert_eq!(tile.y, (1 << MAX_ZOOM) - 1);
    }

    #[test]
    fn test_propagate_keeps_latitude() {
        assert_eq!(LatitudePolicy::Propagate.apply(89.9), 89.9);
    }

    #[test]
    fn test_latitude_policy_parse() {
        assert_eq!(
            LatitudePolicy::from_config_str("Clamp"),
            Some(LatitudePolicy::Clamp)
        );
        assert_eq!(
            LatitudePolicy::from_config_str(" propagate "),
            Some(LatitudePolicy::Propagate)
        );
        assert_eq!(LatitudePolicy::from_config_str("wrap"), None);
    }

    #[test]
    fn test_validate_zoom() {
        assert_eq!(validate_zoom(0), Ok(0));
        assert_eq!(validate_zoom(MAX_ZOOM), Ok(MAX_ZOOM));
        assert_eq!(
            validate_zoom(MAX_ZOOM + 1),
            Err(CoordError::InvalidZoom(MAX_ZOOM + 1))
        );
    }

    #[test]
    fn test_validated_coordinate() {
        assert!(GeoCoordinate::validated(45.0, 90.0).is_ok());
        assert!(matches!(
            GeoCoordinate::validated(91.0, 0.0),
            Err(CoordError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoCoordinate::validated(0.0, -180.5),
            Err(CoordError::InvalidLongitude(_))
        ));
        assert!(matches!(
            GeoCoordinate::validated(f64::NAN, 0.0),
            Err(CoordError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_tile_to_lat_lon_northwest_corner() {
        let tile = TileAddress::new(19295, 24640, 16);
        let (lat, lon) = tile_to_lat_lon(&tile);

        assert!((lat - 40.713).abs() < 0.01, "Latitude should be close to 40.713");
        assert!((lon - (-74.007)).abs() < 0.01, "Longitude should be close to -74.007");
    }

    #[test]
    fn test_normalized_wraps_columns() {
        let tile = TileAddress::new(-1, 3, 2);
        assert_eq!(tile.normalized(), Some(TileAddress::new(3, 3, 2)));

        let tile = TileAddress::new(5, 0, 2);
        assert_eq!(tile.normalized(), Some(TileAddress::new(1, 0, 2)));
    }

    #[test]
    fn test_normalized_drops_off_world_rows() {
        assert_eq!(TileAddress::new(0, -1, 2).normalized(), None);
        assert_eq!(TileAddress::new(0, 4, 2).normalized(), None);
    }

    #[test]
    fn test_sub_tile_offset() {
        let position = AbsolutePosition {
            x: 10.25,
            y: 20.5,
            zoom: 5,
        };
        let tile = TileAddress::containing(&position).unwrap();
        let offset = SubTileOffset::between(&position, &tile, TileSize::default());
        assert_eq!(offset.dx, 64.0);
        assert_eq!(offset.dy, 128.0);
        assert_eq!(offset.rounded(), (64, 128));
    }

    #[test]
    fn test_tile_address_display() {
        assert_eq!(TileAddress::new(3, 5, 7).to_string(), "7/3/5");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_position_in_bounds(
                lat in -85.05..85.05_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=18
            ) {
                let position = project(lat, lon, zoom);
                let n = 2.0_f64.powi(zoom as i32);
                prop_assert!(position.x >= 0.0 && position.x < n, "x {} out of [0, {})", position.x, n);
                prop_assert!(position.y >= 0.0 && position.y < n, "y {} out of [0, {})", position.y, n);

                let tile = TileAddress::containing(&position)?;
                prop_assert!(tile.is_within_world());
            }

            #[test]
            fn test_zoom_doubles_position(
                lat in -85.0..85.0_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..MAX_ZOOM
            ) {
                let low = project(lat, lon, zoom);
                let high = project(lat, lon, zoom + 1);
                prop_assert_eq!(high.x, low.x * 2.0);
                prop_assert_eq!(high.y, low.y * 2.0);
            }

            #[test]
            fn test_projection_is_deterministic(
                lat in -89.0..89.0_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                let a = project(lat, lon, zoom);
                let b = project(lat, lon, zoom);
                prop_assert_eq!(a.x.to_bits(), b.x.to_bits());
                prop_assert_eq!(a.y.to_bits(), b.y.to_bits());
            }

            #[test]
            fn test_roundtrip_within_one_tile(
                lat in -85.0..85.0_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=18
            ) {
                let tile = TileAddress::containing(&project(lat, lon, zoom))?;
                let (corner_lat, corner_lon) = tile_to_lat_lon(&tile);
                let tile_size = 360.0 / 2.0_f64.powi(zoom as i32);

                prop_assert!((corner_lat - lat).abs() < tile_size);
                prop_assert!((corner_lon - lon).abs() < tile_size);
            }

            #[test]
            fn test_longitude_monotonic(
                lat in 0.0..1.0_f64,
                lon1 in -180.0..-90.0_f64,
                lon2 in -90.0..0.0_f64,
                zoom in 10u8..=15
            ) {
                let a = project(lat, lon1, zoom);
                let b = project(lat, lon2, zoom);
                prop_assert!(a.x < b.x);
            }
        }
    }
}
