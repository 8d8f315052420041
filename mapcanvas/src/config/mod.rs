//! Configuration file support.
//!
//! Settings live in an INI file at `<config_dir>/mapcanvas/config.ini`:
//!
//! ```ini
//! [provider]
//! type = osm
//! url_template =
//! max_zoom =
//!
//! [render]
//! zoom = 14
//! rows = 4
//! cols = 4
//! tile_size = 256
//! theme = light
//! latitude_policy = clamp
//!
//! [download]
//! timeout = 30
//! render_timeout = 60
//! parallel = 8
//! user_agent = mapcanvas/0.1.0
//!
//! [logging]
//! directory =
//! ```
//!
//! Command-line arguments override values from the file, which override the
//! built-in defaults.

mod file;
mod keys;

pub use file::{
    config_directory, config_file_path, default_log_directory, ConfigFile, ConfigFileError,
    DownloadSettings, LoggingSettings, ProviderSettings, RenderSettings, CONFIG_FILE_NAME,
};
pub use keys::ConfigKey;
