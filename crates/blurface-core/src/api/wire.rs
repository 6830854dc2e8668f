//! Request and response bodies exchanged with the remote service.
//!
//! Field names here are the remote (snake_case) names. Conversions from the
//! local domain types live next to those types; conversions from responses
//! into domain results live here.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiEndpoints;
use crate::error::ApiError;
use crate::media::{Detections, Frame, VideoInfo, Webcam};
use crate::session::{SourceDescriptor, SourceType};
use crate::settings::{BlurMethod, DisplaySettings, FaceSelection};

const SESSION_CREATION_FALLBACK: &str = "Session creation failed";
const UPLOAD_FALLBACK: &str = "Video upload failed";

/// Body of `POST /session/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub source_type: SourceType,
    pub device_id: u32,
    pub file_path: String,
}

impl From<&SourceDescriptor> for CreateSessionRequest {
    fn from(source: &SourceDescriptor) -> Self {
        Self {
            source_type: source.source_type(),
            device_id: source.device_id(),
            file_path: source.file_path().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CreateSessionResponse {
    /// The new session id, or the server's refusal.
    ///
    /// A body without an explicit `success: true` and a session id counts as a
    /// refusal.
    pub fn into_session_id(self) -> Result<String, ApiError> {
        match (self.success, self.session_id) {
            (true, Some(id)) if !id.is_empty() => Ok(id),
            _ => Err(ApiError::rejected(
                self.error
                    .unwrap_or_else(|| SESSION_CREATION_FALLBACK.to_string()),
            )),
        }
    }
}

/// Body of `PUT /session/{id}/blur-settings`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlurSettingsPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<BlurMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_faces: Option<FaceSelection>,
}

/// Body of `PUT /session/{id}/detection-settings`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionSettingsPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_selection: Option<u8>,
}

/// Query of `GET /session/{id}/frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameQuery {
    pub draw_detections: bool,
    pub apply_blur: bool,
}

impl Default for FrameQuery {
    fn default() -> Self {
        Self {
            draw_detections: false,
            apply_blur: true,
        }
    }
}

impl From<&DisplaySettings> for FrameQuery {
    fn from(display: &DisplaySettings) -> Self {
        Self {
            draw_detections: display.draw_detections,
            apply_blur: display.apply_blur,
        }
    }
}

/// Body of a successful `GET /session/{id}/frame`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FrameResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// Base64-encoded JPEG
    #[serde(default)]
    pub frame: String,
    #[serde(default)]
    pub detection_data: Detections,
}

impl FrameResponse {
    pub fn into_frame(self) -> Result<Frame, ApiError> {
        if !self.success {
            return Err(ApiError::rejected(
                self.error
                    .unwrap_or_else(|| "Unable to retrieve a frame".to_string()),
            ));
        }
        let jpeg = STANDARD
            .decode(self.frame.as_bytes())
            .map_err(|e| ApiError::decode(format!("frame is not valid base64: {}", e)))?;
        Ok(Frame {
            jpeg,
            detections: self.detection_data,
        })
    }
}

/// Body of `GET /session/{id}/detections`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(flatten)]
    pub detections: Detections,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebcamsResponse {
    #[serde(default)]
    pub webcams: Vec<Webcam>,
}

/// Body of `POST /videos/info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoInfoRequest<'a> {
    pub file_path: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoInfoResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub info: VideoInfo,
}

impl VideoInfoResponse {
    pub fn into_video_info(self) -> Result<VideoInfo, ApiError> {
        match self.success {
            Some(false) => Err(ApiError::rejected(
                self.error
                    .unwrap_or_else(|| "Invalid file path".to_string()),
            )),
            _ => Ok(self.info),
        }
    }
}

/// A local file to send as the multipart `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub video_info: Option<VideoInfo>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Server-side location and descriptor of an uploaded video.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedVideo {
    pub file_path: String,
    pub video_info: Option<VideoInfo>,
}

impl UploadResponse {
    pub fn into_uploaded(self) -> Result<UploadedVideo, ApiError> {
        if !self.success {
            return Err(ApiError::rejected(
                self.error.unwrap_or_else(|| UPLOAD_FALLBACK.to_string()),
            ));
        }
        Ok(UploadedVideo {
            file_path: self.file_path.unwrap_or_default(),
            video_info: self.video_info,
        })
    }
}

/// `{success: false, error}` body sent alongside non-2xx statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// A client-side download of a session's processed video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub file_name: String,
}

impl DownloadRequest {
    pub fn for_session(endpoints: &ApiEndpoints, session_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            url: endpoints.download_url(session_id),
            file_name: download_file_name(now),
        }
    }
}

/// `video_floutee_<ISO-8601 with ':' replaced by '-'>.mp4`
pub fn download_file_name(now: DateTime<Utc>) -> String {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true).replace(':', "-");
    format!("video_floutee_{}.mp4", stamp)
}
