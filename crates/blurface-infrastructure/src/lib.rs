//! Infrastructure layer for Blurface: configuration and platform paths.

pub mod config;
pub mod paths;

pub use crate::config::{ClientConfig, ConfigError, ConfigService};
pub use crate::paths::BlurfacePaths;
