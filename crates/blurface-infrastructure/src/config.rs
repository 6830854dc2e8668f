//! Client configuration.
//!
//! Resolution order: built-in defaults, then `config.toml`, then environment
//! variables. Command-line flags are applied last by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::BlurfacePaths;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const ENV_BASE_URL: &str = "BLURFACE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "BLURFACE_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file at {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse configuration file at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Settings for talking to the processing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the processing service
    pub base_url: String,
    /// Transport timeout for every request
    pub timeout_secs: u64,
    /// Period of the detection poller
    pub detection_poll_interval_ms: u64,
    /// Directory downloaded videos are written to (current directory when unset)
    pub download_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            detection_poll_interval_ms: 500,
            download_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn detection_poll_interval(&self) -> Duration {
        Duration::from_millis(self.detection_poll_interval_ms)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Applies environment overrides read through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS.to_string(),
                message: format!("{} ({:?})", e, raw),
            })?;
        }
        Ok(self)
    }

    /// Rejects values the client cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.detection_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "detection_poll_interval_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads the client configuration from disk and the environment.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Uses the platform configuration file (`~/.config/blurface/config.toml`).
    pub fn new() -> Self {
        let path = match BlurfacePaths::config_file() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("[Config] {}; using defaults", e);
                None
            }
        };
        Self { path }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reads the file (a missing file means defaults), applies the process
    /// environment, then validates the result.
    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        let config = self
            .load_file()?
            .with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn load_file(&self) -> Result<ClientConfig, ConfigError> {
        let Some(path) = &self.path else {
            return Ok(ClientConfig::default());
        };

        if !path.exists() {
            tracing::debug!("[Config] No configuration file at {:?}, using defaults", path);
            return Ok(ClientConfig::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!("[Config] Loaded configuration from {:?}", path);
        ClientConfig::from_toml_str(&content, path)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
