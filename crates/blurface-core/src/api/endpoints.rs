//! Paths of the remote service.
//!
//! These paths are part of the compatibility contract and must not change.

use crate::settings::DisplaySettings;

/// Builds request URLs from a service root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base_url: String,
}

impl ApiEndpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn session_url(&self, session_id: &str, action: &str) -> String {
        self.url(&format!("/session/{}/{}", session_id, action))
    }

    pub fn status(&self) -> String {
        self.url("/status")
    }

    pub fn create_session(&self) -> String {
        self.url("/session/create")
    }

    pub fn close_session(&self, session_id: &str) -> String {
        self.session_url(session_id, "close")
    }

    pub fn blur_settings(&self, session_id: &str) -> String {
        self.session_url(session_id, "blur-settings")
    }

    pub fn detection_settings(&self, session_id: &str) -> String {
        self.session_url(session_id, "detection-settings")
    }

    pub fn frame(&self, session_id: &str) -> String {
        self.session_url(session_id, "frame")
    }

    pub fn detections(&self, session_id: &str) -> String {
        self.session_url(session_id, "detections")
    }

    /// MJPEG stream URL. `cache_token` is appended as `t` so that two URLs
    /// built at different moments never hit the same cache entry.
    pub fn stream_url(&self, session_id: &str, display: &DisplaySettings, cache_token: u64) -> String {
        format!(
            "{}?draw_detections={}&apply_blur={}&t={}",
            self.session_url(session_id, "stream"),
            display.draw_detections,
            display.apply_blur,
            cache_token
        )
    }

    pub fn download_url(&self, session_id: &str) -> String {
        self.session_url(session_id, "download")
    }

    pub fn webcams(&self) -> String {
        self.url("/webcams")
    }

    pub fn video_info(&self) -> String {
        self.url("/videos/info")
    }

    pub fn upload_video(&self) -> String {
        self.url("/videos/upload")
    }
}
