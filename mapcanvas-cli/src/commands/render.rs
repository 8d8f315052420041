//! Render command - compose a map image and save it.

use std::path::PathBuf;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::common::{
    build_renderer, resolve_render_config, resolve_theme, MapArgs, ProviderArgs, ThemeName,
};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the render command.
pub struct RenderArgs {
    pub map: MapArgs,
    pub provider: ProviderArgs,
    pub theme: Option<ThemeName>,
    pub no_marker: bool,
    pub parallel: Option<usize>,
    pub render_timeout: Option<u64>,
    pub output: PathBuf,
}

/// Run the render command.
pub fn run(runner: &CliRunner, args: RenderArgs) -> Result<(), CliError> {
    runner.log_startup("render");
    let config = runner.config();

    let mut theme = resolve_theme(args.theme, config)?;
    if args.no_marker {
        theme = theme.without_marker();
    }
    let render_config = resolve_render_config(&args.map, theme, config)?;

    let mut renderer = build_renderer(&args.provider, config)?;
    if let Some(parallel) = args.parallel {
        renderer = renderer.with_concurrency(parallel);
    }
    if let Some(secs) = args.render_timeout {
        renderer = renderer.with_timeout(Duration::from_secs(secs));
    }

    let (width, height) = render_config.layout.pixel_size();
    println!("mapcanvas v{}", mapcanvas::VERSION);
    println!();
    println!(
        "Center:   {:.6}, {:.6} (zoom {})",
        render_config.latitude, render_config.longitude, render_config.zoom
    );
    println!(
        "Grid:     {}×{} tiles, {}×{} px",
        render_config.layout.grid.cols(),
        render_config.layout.grid.rows(),
        width,
        height
    );
    println!("Provider: {}", renderer.compositor().source().provider().name());
    println!();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!(
        "Fetching {} tiles...",
        render_config.layout.grid.cell_count()
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = runner.block_on(renderer.render(&render_config))?;
    spinner.finish_and_clear();
    let output = result?;

    output.raster.save(&args.output)?;

    println!(
        "{} Saved {}×{} map centered on tile {} to {}",
        style("✓").green(),
        output.raster.width(),
        output.raster.height(),
        output.center_tile,
        args.output.display()
    );
    Ok(())
}
