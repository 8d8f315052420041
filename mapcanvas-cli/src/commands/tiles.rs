//! Tiles command - list the grid for a coordinate without fetching.

use console::style;
use serde_json::json;

use mapcanvas::render::Theme;
use mapcanvas::TileSource;

use super::common::{build_renderer, resolve_render_config, MapArgs, ProviderArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the tiles command.
pub struct TilesArgs {
    pub map: MapArgs,
    pub provider: ProviderArgs,
    pub json: bool,
}

/// Run the tiles command.
pub fn run(runner: &CliRunner, args: TilesArgs) -> Result<(), CliError> {
    runner.log_startup("tiles");
    let config = runner.config();

    let render_config = resolve_render_config(&args.map, Theme::default(), config)?;
    let renderer = build_renderer(&args.provider, config)?;
    let plan = renderer.plan(&render_config)?;
    let source = renderer.compositor().source();

    let tiles: Vec<_> = plan
        .grid
        .cells()
        .iter()
        .map(|cell| {
            let fetched = cell.address.normalized();
            let url = fetched.and_then(|address| source.tile_url(&address));
            (cell, fetched, url)
        })
        .collect();

    if args.json {
        let report = json!({
            "center": plan.center_tile,
            "position": plan.position,
            "offset": plan.offset,
            "layout": plan.layout,
            "tiles": tiles
                .iter()
                .map(|(cell, fetched, url)| json!({
                    "row": cell.row,
                    "col": cell.col,
                    "address": fetched.unwrap_or(cell.address),
                    "url": url,
                }))
                .collect::<Vec<_>>(),
        });
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::Config(format!("Failed to encode JSON: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!("Center tile: {}", style(plan.center_tile).bold());
    println!("Offset:      {:.1}, {:.1} px", plan.offset.dx, plan.offset.dy);
    println!();
    for (cell, fetched, url) in &tiles {
        match (fetched, url) {
            (Some(address), Some(url)) => {
                println!("[{},{}] {:<16} {}", cell.row, cell.col, address.to_string(), url)
            }
            _ => println!(
                "[{},{}] {:<16} {}",
                cell.row,
                cell.col,
                cell.address.to_string(),
                style("(outside the map)").dim()
            ),
        }
    }
    Ok(())
}
