//! Init command - write a configuration file with default settings.

use std::path::Path;

use crate::error::CliError;
use crate::runner::load_config;

/// Run the init command.
///
/// Existing settings are preserved; missing keys are filled with defaults.
pub fn run(path: &Path) -> Result<(), CliError> {
    let existed = path.exists();
    let config = load_config(path)?;
    config.save_to(path)?;

    if existed {
        println!("Updated configuration file: {}", path.display());
    } else {
        println!("Created configuration file: {}", path.display());
    }
    println!();
    println!("Edit this file to customize mapcanvas settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapcanvas::config::ConfigFile;

    #[test]
    fn test_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapcanvas").join("config.ini");

        run(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_init_keeps_existing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[render]\nrows = 2\n").unwrap();

        run(&path).unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.render.rows, 2);
        assert_eq!(config.render.cols, 4);
    }
}
