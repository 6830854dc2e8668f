//! Error types for Blurface.

use thiserror::Error;

/// Failure variant of every API contract operation.
///
/// Transport implementations map their native errors into these variants so
/// that the application layer never sees a transport-specific type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status
    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),

    /// The service answered `success: false`
    #[error("{0}")]
    Rejected(String),

    /// The request was refused locally, before any remote call
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Check if the service itself refused the operation
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Which settings object an update targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTarget {
    Blur,
    Detection,
}

impl SettingsTarget {
    fn label(&self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Detection => "detection",
        }
    }
}

impl std::fmt::Display for SettingsTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors surfaced by user-facing actions.
///
/// The `Display` output combines the action description with the underlying
/// failure detail; it is the exact text written into the shared error slot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("Failed to create session: {0}")]
    SessionCreation(#[source] ApiError),

    #[error("Failed to close session: {0}")]
    SessionClose(#[source] ApiError),

    #[error("Failed to update {target} settings: {source}")]
    SettingsUpdate {
        target: SettingsTarget,
        #[source]
        source: ApiError,
    },

    #[error("Failed to load webcams: {0}")]
    WebcamList(#[source] ApiError),

    #[error("Failed to load video info: {0}")]
    VideoInfo(#[source] ApiError),

    #[error("Failed to upload video: {0}")]
    Upload(#[source] ApiError),

    #[error("Failed to download video: {0}")]
    Download(#[source] ApiError),

    #[error("Failed to fetch detections: {0}")]
    DetectionFetch(#[source] ApiError),

    #[error("Failed to fetch frame: {0}")]
    FrameFetch(#[source] ApiError),
}

impl ActionError {
    /// The underlying contract failure.
    pub fn api_error(&self) -> &ApiError {
        match self {
            Self::SessionCreation(e)
            | Self::SessionClose(e)
            | Self::WebcamList(e)
            | Self::VideoInfo(e)
            | Self::Upload(e)
            | Self::Download(e)
            | Self::DetectionFetch(e)
            | Self::FrameFetch(e) => e,
            Self::SettingsUpdate { source, .. } => source,
        }
    }
}

/// A type alias for results of API contract operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
