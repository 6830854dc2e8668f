//! Path management for Blurface configuration files.
//!
//! ```text
//! ~/.config/blurface/          # Config directory (platform default via `dirs`)
//! └── config.toml              # Client configuration
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "blurface";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform configuration directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find configuration directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct BlurfacePaths;

impl BlurfacePaths {
    /// Returns the Blurface configuration directory (e.g. `~/.config/blurface/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
