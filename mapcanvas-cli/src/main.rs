//! mapcanvas CLI - Command-line interface
//!
//! Renders static map images from slippy-map tile servers and inspects the
//! Web Mercator projection and tile grid behind them.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use commands::common::{MapArgs, ProviderArgs, ThemeName};
use commands::config::ConfigCommands;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "mapcanvas")]
#[command(about = "Render static maps from Web Mercator raster tiles", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: <config dir>/mapcanvas/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a map centered on a coordinate and save it as an image
    Render {
        #[command(flatten)]
        map: MapArgs,

        #[command(flatten)]
        provider: ProviderArgs,

        /// Theme preset (default: render.theme from config)
        #[arg(long, value_enum)]
        theme: Option<ThemeName>,

        /// Do not draw the center marker
        #[arg(long)]
        no_marker: bool,

        /// Maximum concurrent tile downloads
        #[arg(long)]
        parallel: Option<usize>,

        /// Timeout for the whole render in seconds
        #[arg(long)]
        render_timeout: Option<u64>,

        /// Output image path (format from extension, e.g. map.png)
        #[arg(long, short)]
        output: PathBuf,
    },

    /// List the tiles and URLs a render would fetch
    Tiles {
        #[command(flatten)]
        map: MapArgs,

        #[command(flatten)]
        provider: ProviderArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the Web Mercator projection of a coordinate
    Project {
        /// Latitude in degrees (-90 to 90)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees (-180 to 180)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Zoom level (default: render.zoom from config)
        #[arg(long, short = 'z')]
        zoom: Option<u8>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file with default settings
    Init,

    /// View or change configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli
        .config
        .unwrap_or_else(mapcanvas::config::config_file_path);

    match cli.command {
        Commands::Init => commands::init::run(&config_path),
        Commands::Config { command } => commands::config::run(command, &config_path),
        Commands::Render {
            map,
            provider,
            theme,
            no_marker,
            parallel,
            render_timeout,
            output,
        } => {
            let runner = CliRunner::new(&config_path, cli.verbose)?;
            commands::render::run(
                &runner,
                commands::render::RenderArgs {
                    map,
                    provider,
                    theme,
                    no_marker,
                    parallel,
                    render_timeout,
                    output,
                },
            )
        }
        Commands::Tiles {
            map,
            provider,
            json,
        } => {
            let runner = CliRunner::new(&config_path, cli.verbose)?;
            commands::tiles::run(
                &runner,
                commands::tiles::TilesArgs {
                    map,
                    provider,
                    json,
                },
            )
        }
        Commands::Project {
            lat,
            lon,
            zoom,
            json,
        } => {
            let runner = CliRunner::new(&config_path, cli.verbose)?;
            commands::project::run(
                &runner,
                commands::project::ProjectArgs {
                    lat,
                    lon,
                    zoom,
                    json,
                },
            )
        }
    }
}
