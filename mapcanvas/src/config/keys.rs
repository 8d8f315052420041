//! Typed access to individual configuration keys.

use std::path::PathBuf;
use std::str::FromStr;

use crate::coord::{LatitudePolicy, MAX_ZOOM};
use crate::provider::validate_template;
use crate::render::Theme;

use super::file::{ConfigFile, ConfigFileError};

/// A `section.key` setting in `config.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ProviderType,
    ProviderUrlTemplate,
    ProviderMaxZoom,
    RenderZoom,
    RenderRows,
    RenderCols,
    RenderTileSize,
    RenderTheme,
    RenderLatitudePolicy,
    DownloadTimeout,
    DownloadRenderTimeout,
    DownloadParallel,
    DownloadUserAgent,
    LoggingDirectory,
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ProviderType,
            ConfigKey::ProviderUrlTemplate,
            ConfigKey::ProviderMaxZoom,
            ConfigKey::RenderZoom,
            ConfigKey::RenderRows,
            ConfigKey::RenderCols,
            ConfigKey::RenderTileSize,
            ConfigKey::RenderTheme,
            ConfigKey::RenderLatitudePolicy,
            ConfigKey::DownloadTimeout,
            ConfigKey::DownloadRenderTimeout,
            ConfigKey::DownloadParallel,
            ConfigKey::DownloadUserAgent,
            ConfigKey::LoggingDirectory,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::ProviderType | ConfigKey::ProviderUrlTemplate | ConfigKey::ProviderMaxZoom => {
                "provider"
            }
            ConfigKey::RenderZoom
            | ConfigKey::RenderRows
            | ConfigKey::RenderCols
            | ConfigKey::RenderTileSize
            | ConfigKey::RenderTheme
            | ConfigKey::RenderLatitudePolicy => "render",
            ConfigKey::DownloadTimeout
            | ConfigKey::DownloadRenderTimeout
            | ConfigKey::DownloadParallel
            | ConfigKey::DownloadUserAgent => "download",
            ConfigKey::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::ProviderType => "type",
            ConfigKey::ProviderUrlTemplate => "url_template",
            ConfigKey::ProviderMaxZoom => "max_zoom",
            ConfigKey::RenderZoom => "zoom",
            ConfigKey::RenderRows => "rows",
            ConfigKey::RenderCols => "cols",
            ConfigKey::RenderTileSize => "tile_size",
            ConfigKey::RenderTheme => "theme",
            ConfigKey::RenderLatitudePolicy => "latitude_policy",
            ConfigKey::DownloadTimeout => "timeout",
            ConfigKey::DownloadRenderTimeout => "render_timeout",
            ConfigKey::DownloadParallel => "parallel",
            ConfigKey::DownloadUserAgent => "user_agent",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Dotted name, e.g. `render.zoom`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as written to the file (empty when unset).
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ProviderType => config.provider.provider_type.clone(),
            ConfigKey::ProviderUrlTemplate => {
                config.provider.url_template.clone().unwrap_or_default()
            }
            ConfigKey::ProviderMaxZoom => config
                .provider
                .max_zoom
                .map(|z| z.to_string())
                .unwrap_or_default(),
            ConfigKey::RenderZoom => config.render.zoom.to_string(),
            ConfigKey::RenderRows => config.render.rows.to_string(),
            ConfigKey::RenderCols => config.render.cols.to_string(),
            ConfigKey::RenderTileSize => config.render.tile_size.to_string(),
            ConfigKey::RenderTheme => config.render.theme.clone(),
            ConfigKey::RenderLatitudePolicy => config.render.latitude_policy.as_str().to_string(),
            ConfigKey::DownloadTimeout => config.download.timeout.to_string(),
            ConfigKey::DownloadRenderTimeout => config.download.render_timeout.to_string(),
            ConfigKey::DownloadParallel => config.download.parallel.to_string(),
            ConfigKey::DownloadUserAgent => config.download.user_agent.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse and store a value.
    ///
    /// An empty value clears optional keys.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigFileError> {
        let value = value.trim();
        match self {
            ConfigKey::ProviderType => {
                let normalized = value.to_lowercase();
                if !matches!(normalized.as_str(), "osm" | "arcgis" | "custom") {
                    return Err(ConfigFileError::invalid(
                        *self,
                        value,
                        "expected osm, arcgis or custom",
                    ));
                }
                config.provider.provider_type = normalized;
            }
            ConfigKey::ProviderUrlTemplate => {
                if value.is_empty() {
                    config.provider.url_template = None;
                } else {
                    validate_template(value)
                        .map_err(|e| ConfigFileError::invalid(*self, value, e.to_string()))?;
                    config.provider.url_template = Some(value.to_string());
                }
            }
            ConfigKey::ProviderMaxZoom => {
                config.provider.max_zoom = if value.is_empty() {
                    None
                } else {
                    Some(self.parse_zoom(value)?)
                };
            }
            ConfigKey::RenderZoom => config.render.zoom = self.parse_zoom(value)?,
            ConfigKey::RenderRows => config.render.rows = self.parse_positive(value)?,
            ConfigKey::RenderCols => config.render.cols = self.parse_positive(value)?,
            ConfigKey::RenderTileSize => config.render.tile_size = self.parse_positive(value)?,
            ConfigKey::RenderTheme => {
                let theme = Theme::named(value)
                    .map_err(|e| ConfigFileError::invalid(*self, value, e.to_string()))?;
                config.render.theme = theme.name().to_string();
            }
            ConfigKey::RenderLatitudePolicy => {
                config.render.latitude_policy = LatitudePolicy::from_config_str(value)
                    .ok_or_else(|| {
                        ConfigFileError::invalid(*self, value, "expected clamp or propagate")
                    })?;
            }
            ConfigKey::DownloadTimeout => {
                config.download.timeout = self.parse_positive::<u64>(value)?;
            }
            ConfigKey::DownloadRenderTimeout => {
                config.download.render_timeout = self.parse_positive::<u64>(value)?;
            }
            ConfigKey::DownloadParallel => {
                config.download.parallel = self.parse_positive::<usize>(value)?;
            }
            ConfigKey::DownloadUserAgent => {
                if value.is_empty() {
                    return Err(ConfigFileError::invalid(*self, value, "must not be empty"));
                }
                config.download.user_agent = value.to_string();
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }
        Ok(())
    }

    fn parse_zoom(&self, value: &str) -> Result<u8, ConfigFileError> {
        let zoom: u8 = value
            .parse()
            .map_err(|_| ConfigFileError::invalid(*self, value, "expected an integer"))?;
        if zoom > MAX_ZOOM {
            return Err(ConfigFileError::invalid(
                *self,
                value,
                format!("zoom must be at most {}", MAX_ZOOM),
            ));
        }
        Ok(zoom)
    }

    fn parse_positive<T>(&self, value: &str) -> Result<T, ConfigFileError>
    where
        T: FromStr + PartialEq + Default,
    {
        let parsed: T = value
            .parse()
            .map_err(|_| ConfigFileError::invalid(*self, value, "expected a positive integer"))?;
        if parsed == T::default() {
            return Err(ConfigFileError::invalid(*self, value, "must be at least 1"));
        }
        Ok(parsed)
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigFileError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!(
            "render.zoom".parse::<ConfigKey>().unwrap(),
            ConfigKey::RenderZoom
        );
        assert_eq!(
            "Provider.URL_Template".parse::<ConfigKey>().unwrap(),
            ConfigKey::ProviderUrlTemplate
        );
        assert!("zoom".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<String> = ConfigKey::all().iter().map(|k| k.name()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut config = ConfigFile::default();
        ConfigKey::RenderLatitudePolicy
            .set(&mut config, "propagate")
            .unwrap();
        assert_eq!(ConfigKey::RenderLatitudePolicy.get(&config), "propagate");

        ConfigKey::RenderTheme.set(&mut config, "DARK").unwrap();
        assert_eq!(ConfigKey::RenderTheme.get(&config), "dark");
    }

    #[test]
    fn test_zoom_bounds() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::RenderZoom.set(&mut config, "22").is_ok());
        assert!(ConfigKey::RenderZoom.set(&mut config, "23").is_err());
        assert!(ConfigKey::RenderZoom.set(&mut config, "-1").is_err());
    }

    #[test]
    fn test_zero_rejected_for_counts() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::RenderRows.set(&mut config, "0").is_err());
        assert!(ConfigKey::RenderTileSize.set(&mut config, "0").is_err());
        assert!(ConfigKey::DownloadParallel.set(&mut config, "0").is_err());
        assert_eq!(config.render.rows, 4);
    }

    #[test]
    fn test_optional_keys_clear() {
        let mut config = ConfigFile::default();
        ConfigKey::ProviderMaxZoom.set(&mut config, "17").unwrap();
        assert_eq!(config.provider.max_zoom, Some(17));

        ConfigKey::ProviderMaxZoom.set(&mut config, "").unwrap();
        assert_eq!(config.provider.max_zoom, None);
        assert_eq!(ConfigKey::ProviderMaxZoom.get(&config), "");
    }

    #[test]
    fn test_invalid_template_rejected() {
        let mut config = ConfigFile::default();
        let result = ConfigKey::ProviderUrlTemplate.set(&mut config, "https://example.com/{z}");
        assert!(matches!(result, Err(ConfigFileError::InvalidValue { .. })));
    }

    #[test]
    fn test_provider_type_validation() {
        let mut config = ConfigFile::default();
        ConfigKey::ProviderType.set(&mut config, "ArcGIS").unwrap();
        assert_eq!(config.provider.provider_type, "arcgis");
        assert!(ConfigKey::ProviderType.set(&mut config, "bing").is_err());
    }
}
