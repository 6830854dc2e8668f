//! API contract consumed from the remote processing service.
//!
//! Every remote operation is described here as a typed request and a typed
//! `ApiResult`. Implementations own the transport; nothing in this module keeps
//! state, retries, or caches.

pub mod endpoints;
pub mod wire;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::media::{Frame, ServiceStatus, VideoInfo, Webcam};

pub use endpoints::ApiEndpoints;
pub use wire::{
    BlurSettingsPayload, CreateSessionRequest, CreateSessionResponse, DetectionSettingsPayload,
    DetectionsResponse, DownloadRequest, FrameQuery, UploadFile, UploadResponse, UploadedVideo,
};

/// Remote operations of the face-blurring service.
#[async_trait]
pub trait VideoProcessingApi: Send + Sync {
    /// URL builder for this service instance.
    fn endpoints(&self) -> &ApiEndpoints;

    /// `GET /status`
    async fn status(&self) -> ApiResult<ServiceStatus>;

    /// `POST /session/create`
    ///
    /// Returns the decoded body even when it reports `success: false`, so the
    /// caller can decide how to surface the server message.
    async fn create_session(&self, request: &CreateSessionRequest)
    -> ApiResult<CreateSessionResponse>;

    /// `POST /session/{id}/close`
    async fn close_session(&self, session_id: &str) -> ApiResult<()>;

    /// `PUT /session/{id}/blur-settings`
    async fn update_blur_settings(
        &self,
        session_id: &str,
        payload: &BlurSettingsPayload,
    ) -> ApiResult<()>;

    /// `PUT /session/{id}/detection-settings`
    async fn update_detection_settings(
        &self,
        session_id: &str,
        payload: &DetectionSettingsPayload,
    ) -> ApiResult<()>;

    /// `GET /session/{id}/frame`
    async fn get_frame(&self, session_id: &str, query: &FrameQuery) -> ApiResult<Frame>;

    /// `GET /session/{id}/detections`
    async fn get_detections(&self, session_id: &str) -> ApiResult<DetectionsResponse>;

    /// `GET /webcams`
    async fn list_webcams(&self) -> ApiResult<Vec<Webcam>>;

    /// `POST /videos/info`
    async fn video_info(&self, file_path: &str) -> ApiResult<VideoInfo>;

    /// `POST /videos/upload` (multipart, field `file`)
    async fn upload_video(&self, file: UploadFile) -> ApiResult<UploadResponse>;
}

/// Hands a download URL to whatever can save it.
///
/// No completion signal is expected beyond the returned result: the download
/// may still be running when `trigger` returns.
#[async_trait]
pub trait DownloadTrigger: Send + Sync {
    async fn trigger(&self, request: &DownloadRequest) -> ApiResult<()>;
}
