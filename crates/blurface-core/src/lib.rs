//! Domain layer for Blurface.
//!
//! Holds the session model, the settings models and their wire mappings, the
//! media records returned by the processing service, the error taxonomy, and
//! the API contract that every transport implementation fulfils.

pub mod api;
pub mod error;
pub mod media;
pub mod session;
pub mod settings;

// Re-export common error types
pub use error::{ActionError, ApiError, SettingsTarget};
