//! Shared setup for commands that render or inspect maps.

use std::future::Future;
use std::path::{Path, PathBuf};

use mapcanvas::config::ConfigFile;
use mapcanvas::logging::{init_logging, LoggingGuard, DEFAULT_LOG_FILE};
use tracing::info;

use crate::error::CliError;

/// Loads configuration, installs logging and runs async work.
pub struct CliRunner {
    config: ConfigFile,
    config_path: PathBuf,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load `config_path` (defaults if it does not exist) and start logging.
    pub fn new(config_path: &Path, verbose: bool) -> Result<Self, CliError> {
        let config = load_config(config_path)?;
        let logging = init_logging(&config.log_directory(), DEFAULT_LOG_FILE, verbose)?;

        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            _logging: logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Record the command being run.
    pub fn log_startup(&self, command: &str) {
        info!(
            version = mapcanvas::VERSION,
            command,
            config = %self.config_path.display(),
            "mapcanvas starting"
        );
    }

    /// Run a future to completion on a fresh multi-threaded runtime.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output, CliError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))?;
        Ok(runtime.block_on(future))
    }
}

/// Load a configuration file, falling back to defaults when it is absent.
pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    if path.exists() {
        Ok(ConfigFile::load_from(path)?)
    } else {
        Ok(ConfigFile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("none.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[render]\nzoom = 3\n").unwrap();

        assert_eq!(load_config(&path).unwrap().render.zoom, 3);
    }
}
