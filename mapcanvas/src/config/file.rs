//! INI configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::coord::{LatitudePolicy, TileSize, MAX_ZOOM};
use crate::grid::GridSize;
use crate::provider::{ProviderConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::render::{Layout, Theme, DEFAULT_RENDER_TIMEOUT, DEFAULT_ZOOM};

use super::keys::ConfigKey;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors raised while loading, saving or editing the configuration.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

impl ConfigFileError {
    pub(crate) fn invalid(key: ConfigKey, value: &str, reason: impl Into<String>) -> Self {
        ConfigFileError::InvalidValue {
            key: key.name(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// `[provider]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// `osm`, `arcgis` or `custom`.
    pub provider_type: String,
    /// URL template for the `custom` provider.
    pub url_template: Option<String>,
    pub max_zoom: Option<u8>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider_type: "osm".to_string(),
            url_template: None,
            max_zoom: None,
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub zoom: u8,
    pub rows: u32,
    pub cols: u32,
    pub tile_size: u32,
    pub theme: String,
    pub latitude_policy: LatitudePolicy,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let grid = GridSize::default();
        Self {
            zoom: DEFAULT_ZOOM,
            rows: grid.rows(),
            cols: grid.cols(),
            tile_size: TileSize::default().width,
            theme: Theme::default().name().to_string(),
            latitude_policy: LatitudePolicy::default(),
        }
    }
}

/// `[download]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSettings {
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// Whole-render timeout in seconds.
    pub render_timeout: u64,
    /// Concurrent tile downloads.
    pub parallel: usize,
    pub user_agent: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            render_timeout: DEFAULT_RENDER_TIMEOUT.as_secs(),
            parallel: crate::compose::DEFAULT_CONCURRENCY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoggingSettings {
    /// Log directory; [`default_log_directory`] when unset.
    pub directory: Option<PathBuf>,
}

/// Contents of `config.ini`.
///
/// Missing keys keep their defaults and unknown keys are ignored, so older
/// files keep loading as settings are added.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFile {
    pub provider: ProviderSettings,
    pub render: RenderSettings,
    pub download: DownloadSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from [`config_file_path`], or defaults if the file does not exist.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigFileError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigFileError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            match ini.get_from(Some(key.section()), key.key_name()) {
                Some(value) if !value.trim().is_empty() => key.set(&mut config, value.trim())?,
                _ => {}
            }
        }
        Ok(config)
    }

    /// Save to [`config_file_path`].
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigFileError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }

        ini.write_to_file(path)
            .map_err(|source| ConfigFileError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Update one `section.key` from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigFileError> {
        let key: ConfigKey = key.parse()?;
        key.set(self, value)
    }

    /// Provider selected by the `[provider]` section.
    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigFileError> {
        match self.provider.provider_type.as_str() {
            "osm" => Ok(ProviderConfig::Osm),
            "arcgis" => Ok(ProviderConfig::ArcGis),
            "custom" => {
                let template = self.provider.url_template.clone().ok_or_else(|| {
                    ConfigFileError::invalid(
                        ConfigKey::ProviderUrlTemplate,
                        "",
                        "required when provider.type = custom",
                    )
                })?;
                Ok(ProviderConfig::Custom {
                    name: "Custom".to_string(),
                    template,
                    max_zoom: self.provider.max_zoom.unwrap_or(MAX_ZOOM),
                })
            }
            other => Err(ConfigFileError::invalid(
                ConfigKey::ProviderType,
                other,
                "expected osm, arcgis or custom",
            )),
        }
    }

    /// Layout from the `[render]` section.
    pub fn layout(&self) -> Result<Layout, ConfigFileError> {
        Layout::new(
            self.render.rows,
            self.render.cols,
            TileSize::square(self.render.tile_size),
        )
        .map_err(|e| ConfigFileError::InvalidValue {
            key: "render".to_string(),
            value: format!(
                "{}x{}@{}",
                self.render.rows, self.render.cols, self.render.tile_size
            ),
            reason: e.to_string(),
        })
    }

    /// Theme preset from the `[render]` section.
    pub fn theme(&self) -> Result<Theme, ConfigFileError> {
        Theme::named(&self.render.theme).map_err(|e| {
            ConfigFileError::invalid(ConfigKey::RenderTheme, &self.render.theme, e.to_string())
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.download.timeout)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.download.render_timeout)
    }

    /// Log directory, falling back to [`default_log_directory`].
    pub fn log_directory(&self) -> PathBuf {
        self.logging
            .directory
            .clone()
            .unwrap_or_else(default_log_directory)
    }
}

/// Directory holding the configuration file (`<config_dir>/mapcanvas`).
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mapcanvas")
}

/// Full path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// Default log directory (`<cache_dir>/mapcanvas/logs`).
pub fn default_log_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mapcanvas")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.provider.provider_type, "osm");
        assert_eq!(config.render.zoom, 14);
        assert_eq!((config.render.rows, config.render.cols), (4, 4));
        assert_eq!(config.render.tile_size, 256);
        assert_eq!(config.render.theme, "light");
        assert_eq!(config.download.timeout, 30);
        assert_eq!(config.download.render_timeout, 60);
        assert_eq!(config.download.parallel, 8);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.render.zoom = 9;
        config.render.theme = "dark".to_string();
        config.provider.provider_type = "custom".to_string();
        config.provider.url_template = Some("https://t.example.com/{z}/{x}/{y}.png".to_string());
        config.logging.directory = Some(dir.path().join("logs"));
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(
            &path,
            "[render]\nzoom = 5\nunknown = 1\n\n[download]\nparallel = 2\n\n[extra]\nfoo = bar\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.render.zoom, 5);
        assert_eq!(config.download.parallel, 2);
        assert_eq!(config.render.rows, 4);
        assert_eq!(config.provider.provider_type, "osm");
    }

    #[test]
    fn test_invalid_value_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[render]\nzoom = far\n").unwrap();

        let result = ConfigFile::load_from(&path);
        assert!(matches!(result, Err(ConfigFileError::InvalidValue { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigFile::load_from(&dir.path().join("absent.ini"));
        assert!(matches!(result, Err(ConfigFileError::Io { .. })));
    }

    #[test]
    fn test_set_dotted_key() {
        let mut config = ConfigFile::default();
        config.set("render.rows", "3").unwrap();
        config.set("download.user_agent", "test-agent/1.0").unwrap();

        assert_eq!(config.render.rows, 3);
        assert_eq!(config.download.user_agent, "test-agent/1.0");
        assert!(matches!(
            config.set("render.nope", "1"),
            Err(ConfigFileError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_provider_config() {
        let mut config = ConfigFile::default();
        assert_eq!(config.provider_config().unwrap(), ProviderConfig::Osm);

        config.provider.provider_type = "custom".to_string();
        assert!(config.provider_config().is_err());

        config.provider.url_template = Some("https://x.example.com/{z}/{x}/{y}".to_string());
        config.provider.max_zoom = Some(12);
        match config.provider_config().unwrap() {
            ProviderConfig::Custom { max_zoom, .. } => assert_eq!(max_zoom, 12),
            other => panic!("Expected custom provider, got {:?}", other),
        }
    }

    #[test]
    fn test_layout_and_theme() {
        let mut config = ConfigFile::default();
        config.render.cols = 5;
        config.render.tile_size = 128;

        assert_eq!(config.layout().unwrap().pixel_size(), (640, 512));
        assert_eq!(config.theme().unwrap(), Theme::light());
    }

    #[test]
    fn test_log_directory_fallback() {
        let mut config = ConfigFile::default();
        assert_eq!(config.log_directory(), default_log_directory());

        config.logging.directory = Some(PathBuf::from("/var/log/mapcanvas"));
        assert_eq!(config.log_directory(), PathBuf::from("/var/log/mapcanvas"));
    }

    #[test]
    fn test_config_file_path_name() {
        let path = config_file_path();
        assert!(path.ends_with("mapcanvas/config.ini"));
    }
}
