//! Common types and utilities shared across CLI commands.

use std::time::Duration;

use clap::{Args, ValueEnum};
use mapcanvas::config::ConfigFile;
use mapcanvas::coord::{TileSize, MAX_ZOOM};
use mapcanvas::provider::ProviderConfig;
use mapcanvas::render::{HttpRenderer, Layout, RenderConfig, Theme};

use crate::error::CliError;

/// Tile provider selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ProviderType {
    /// OpenStreetMap standard tiles
    Osm,
    /// Esri World Imagery
    Arcgis,
    /// Any XYZ tile server (requires --url-template or provider.url_template)
    Custom,
}

impl ProviderType {
    /// Convert to a ProviderConfig, requiring a template for custom servers.
    pub fn to_config(
        self,
        url_template: Option<String>,
        max_zoom: Option<u8>,
    ) -> Result<ProviderConfig, CliError> {
        match self {
            ProviderType::Osm => Ok(ProviderConfig::osm()),
            ProviderType::Arcgis => Ok(ProviderConfig::arcgis()),
            ProviderType::Custom => {
                let template = url_template.ok_or_else(|| {
                    CliError::Config(
                        "The custom provider requires a URL template. \
                         Set provider.url_template in config.ini or use --url-template"
                            .to_string(),
                    )
                })?;
                Ok(ProviderConfig::Custom {
                    name: "Custom".to_string(),
                    template,
                    max_zoom: max_zoom.unwrap_or(MAX_ZOOM),
                })
            }
        }
    }

    /// Parse from config file string.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "osm" => Some(ProviderType::Osm),
            "arcgis" => Some(ProviderType::Arcgis),
            "custom" => Some(ProviderType::Custom),
            _ => None,
        }
    }
}

/// Theme preset selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ThemeName {
    Light,
    Dark,
}

impl From<ThemeName> for Theme {
    fn from(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => Theme::light(),
            ThemeName::Dark => Theme::dark(),
        }
    }
}

/// Coordinate and layout arguments shared by `render`, `tiles` and `project`.
#[derive(Debug, Clone, Args)]
pub struct MapArgs {
    /// Latitude in degrees (-90 to 90)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees (-180 to 180)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Zoom level (default: render.zoom from config)
    #[arg(long, short = 'z')]
    pub zoom: Option<u8>,

    /// Number of tile rows
    #[arg(long)]
    pub rows: Option<u32>,

    /// Number of tile columns
    #[arg(long)]
    pub cols: Option<u32>,

    /// Tile edge length in pixels
    #[arg(long)]
    pub tile_size: Option<u32>,
}

/// Tile server arguments shared by `render` and `tiles`.
#[derive(Debug, Clone, Args)]
pub struct ProviderArgs {
    /// Tile provider (default: provider.type from config)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderType>,

    /// URL template for the custom provider, e.g. https://host/{z}/{x}/{y}.png
    #[arg(long)]
    pub url_template: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Resolve provider settings from CLI args and config.
pub fn resolve_provider(args: &ProviderArgs, config: &ConfigFile) -> Result<ProviderConfig, CliError> {
    // CLI takes precedence, then config
    let provider = match args.provider {
        Some(provider) => provider,
        None => ProviderType::from_config_str(&config.provider.provider_type).ok_or_else(|| {
            CliError::Config(format!(
                "Unknown provider '{}' in config.ini",
                config.provider.provider_type
            ))
        })?,
    };

    let template = args
        .url_template
        .clone()
        .or_else(|| config.provider.url_template.clone());

    provider.to_config(template, config.provider.max_zoom)
}

/// Resolve the output layout from CLI args and config.
pub fn resolve_layout(args: &MapArgs, config: &ConfigFile) -> Result<Layout, CliError> {
    let rows = args.rows.unwrap_or(config.render.rows);
    let cols = args.cols.unwrap_or(config.render.cols);
    let tile_size = args.tile_size.unwrap_or(config.render.tile_size);

    Layout::new(rows, cols, TileSize::square(tile_size)).map_err(|e| CliError::Config(e.to_string()))
}

/// Resolve the theme from CLI args and config.
pub fn resolve_theme(cli_theme: Option<ThemeName>, config: &ConfigFile) -> Result<Theme, CliError> {
    match cli_theme {
        Some(name) => Ok(name.into()),
        None => Ok(config.theme()?),
    }
}

/// Build the render request described by the arguments.
pub fn resolve_render_config(
    args: &MapArgs,
    theme: Theme,
    config: &ConfigFile,
) -> Result<RenderConfig, CliError> {
    let zoom = args.zoom.unwrap_or(config.render.zoom);
    let layout = resolve_layout(args, config)?;
    Ok(RenderConfig::new(args.lat, args.lon, zoom)
        .with_layout(layout)
        .with_theme(theme))
}

/// Build an HTTP renderer for the resolved provider.
pub fn build_renderer(args: &ProviderArgs, config: &ConfigFile) -> Result<HttpRenderer, CliError> {
    let provider = resolve_provider(args, config)?;
    let timeout = Duration::from_secs(args.timeout.unwrap_or(config.download.timeout));

    let renderer = HttpRenderer::for_provider(&provider, timeout, &config.download.user_agent)?
        .with_latitude_policy(config.render.latitude_policy)
        .with_concurrency(config.download.parallel)
        .with_timeout(config.render_timeout());
    Ok(renderer)
}
