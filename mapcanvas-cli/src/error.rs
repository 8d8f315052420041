//! CLI error type.

use std::fmt;

use mapcanvas::compose::RasterError;
use mapcanvas::config::ConfigFileError;
use mapcanvas::logging::LoggingError;
use mapcanvas::render::RenderError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or conflicting settings.
    Config(String),

    /// The configuration file could not be read or written.
    ConfigFile(ConfigFileError),

    /// Logging could not be initialized.
    Logging(LoggingError),

    /// Rendering failed.
    Render(RenderError),

    /// The rendered map could not be written.
    Output(RasterError),

    /// Failed to create the Tokio runtime.
    Runtime(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Render(e) => write!(f, "{}", e),
            CliError::Output(e) => write!(f, "Failed to write map: {}", e),
            CliError::Runtime(msg) => write!(f, "Failed to create Tokio runtime: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::Output(e) => Some(e),
            CliError::Config(_) | CliError::Runtime(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        CliError::Render(e)
    }
}

impl From<RasterError> for CliError {
    fn from(e: RasterError) -> Self {
        CliError::Output(e)
    }
}
