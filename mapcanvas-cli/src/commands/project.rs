//! Project command - show the Web Mercator projection of a coordinate.

use serde_json::json;

use mapcanvas::coord::{
    project, relative_position, tile_to_lat_lon, validate_zoom, GeoCoordinate, SubTileOffset,
    TileAddress, TileSize,
};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the project command.
pub struct ProjectArgs {
    pub lat: f64,
    pub lon: f64,
    pub zoom: Option<u8>,
    pub json: bool,
}

/// Run the project command.
pub fn run(runner: &CliRunner, args: ProjectArgs) -> Result<(), CliError> {
    runner.log_startup("project");
    let config = runner.config();

    let zoom = validate_zoom(args.zoom.unwrap_or(config.render.zoom))
        .map_err(|e| CliError::Config(e.to_string()))?;
    let requested = GeoCoordinate::validated(args.lat, args.lon)
        .map_err(|e| CliError::Config(e.to_string()))?;
    let latitude = config.render.latitude_policy.apply(requested.latitude);

    let relative = relative_position(latitude, requested.longitude);
    let absolute = project(latitude, requested.longitude, zoom);
    let unwrapped =
        TileAddress::containing(&absolute).map_err(|e| CliError::Config(e.to_string()))?;
    let tile = TileAddress::containing_on_world(&absolute)
        .map_err(|e| CliError::Config(e.to_string()))?;
    let tile_size = TileSize::square(config.render.tile_size);
    let offset = SubTileOffset::between(&absolute, &unwrapped, tile_size);
    let (corner_lat, corner_lon) = tile_to_lat_lon(&tile);

    if args.json {
        let report = json!({
            "latitude": latitude,
            "longitude": requested.longitude,
            "zoom": zoom,
            "relative": relative,
            "absolute": absolute,
            "tile": tile,
            "offset": offset,
            "tile_corner": { "latitude": corner_lat, "longitude": corner_lon },
        });
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::Config(format!("Failed to encode JSON: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    if latitude != requested.latitude {
        println!(
            "Latitude {} clamped to {:.10} ({} policy)",
            requested.latitude,
            latitude,
            config.render.latitude_policy.as_str()
        );
    }
    println!("Relative:  {:.10}, {:.10}", relative.x, relative.y);
    println!("Absolute:  {:.6}, {:.6} (zoom {})", absolute.x, absolute.y, zoom);
    println!("Tile:      {}", tile);
    println!(
        "Offset:    {:.1}, {:.1} px ({} px tiles)",
        offset.dx, offset.dy, tile_size.width
    );
    println!("NW corner: {:.6}, {:.6}", corner_lat, corner_lon);
    Ok(())
}
