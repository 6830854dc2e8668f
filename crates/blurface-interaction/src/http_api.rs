//! HttpVideoApi - REST implementation of the processing service contract.
//!
//! Non-2xx responses are mapped to `ApiError::Status`, using the `error` field
//! of the JSON body as the message when the service provides one. Timeouts are
//! enforced here, by the HTTP client, and nowhere else.

use std::time::Duration;

use async_trait::async_trait;
use blurface_core::api::wire::{
    ErrorBody, FrameResponse, VideoInfoRequest, VideoInfoResponse, WebcamsResponse,
};
use blurface_core::api::{
    ApiEndpoints, BlurSettingsPayload, CreateSessionRequest, CreateSessionResponse,
    DetectionSettingsPayload, DetectionsResponse, FrameQuery, UploadFile, UploadResponse,
    VideoProcessingApi,
};
use blurface_core::error::{ApiError, ApiResult};
use blurface_core::media::{Frame, ServiceStatus, VideoInfo, Webcam};
use blurface_infrastructure::ClientConfig;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Client for the face-blurring service.
#[derive(Clone)]
pub struct HttpVideoApi {
    client: Client,
    endpoints: ApiEndpoints,
}

impl HttpVideoApi {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoints: ApiEndpoints::new(base_url),
        })
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    /// Sends the request and fails on any non-success status.
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(status_error(status, &text))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        let text = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&text).map_err(|e| ApiError::decode(e.to_string()))
    }

    /// Decodes the body as `T` whatever the status, so that `{success: false,
    /// error}` replies on 4xx/5xx reach the caller intact.
    async fn send_lenient<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        match serde_json::from_str::<T>(&text) {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(status_error(status, &text)),
            Err(e) => Err(ApiError::decode(e.to_string())),
        }
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::transport(format!("request timed out: {}", err))
    } else {
        ApiError::transport(err.to_string())
    }
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });
    ApiError::status(status.as_u16(), message)
}

#[async_trait]
impl VideoProcessingApi for HttpVideoApi {
    fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    async fn status(&self) -> ApiResult<ServiceStatus> {
        self.send_json(self.client.get(self.endpoints.status())).await
    }

    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> ApiResult<CreateSessionResponse> {
        tracing::debug!(
            "[HttpVideoApi] Creating {} session (device {}, file {:?})",
            request.source_type,
            request.device_id,
            request.file_path
        );
        self.send_lenient(
            self.client
                .post(self.endpoints.create_session())
                .json(request),
        )
        .await
    }

    async fn close_session(&self, session_id: &str) -> ApiResult<()> {
        self.send(self.client.post(self.endpoints.close_session(session_id)))
            .await?;
        Ok(())
    }

    async fn update_blur_settings(
        &self,
        session_id: &str,
        payload: &BlurSettingsPayload,
    ) -> ApiResult<()> {
        self.send(
            self.client
                .put(self.endpoints.blur_settings(session_id))
                .json(payload),
        )
        .await?;
        Ok(())
    }

    async fn update_detection_settings(
        &self,
        session_id: &str,
        payload: &DetectionSettingsPayload,
    ) -> ApiResult<()> {
        self.send(
            self.client
                .put(self.endpoints.detection_settings(session_id))
                .json(payload),
        )
        .await?;
        Ok(())
    }

    async fn get_frame(&self, session_id: &str, query: &FrameQuery) -> ApiResult<Frame> {
        let response: FrameResponse = self
            .send_json(
                self.client
                    .get(self.endpoints.frame(session_id))
                    .query(query),
            )
            .await?;
        response.into_frame()
    }

    async fn get_detections(&self, session_id: &str) -> ApiResult<DetectionsResponse> {
        self.send_json(self.client.get(self.endpoints.detections(session_id)))
            .await
    }

    async fn list_webcams(&self) -> ApiResult<Vec<Webcam>> {
        let response: WebcamsResponse = self
            .send_json(self.client.get(self.endpoints.webcams()))
            .await?;
        Ok(response.webcams)
    }

    async fn video_info(&self, file_path: &str) -> ApiResult<VideoInfo> {
        let response: VideoInfoResponse = self
            .send_json(
                self.client
                    .post(self.endpoints.video_info())
                    .json(&VideoInfoRequest { file_path }),
            )
            .await?;
        response.into_video_info()
    }

    async fn upload_video(&self, file: UploadFile) -> ApiResult<UploadResponse> {
        let content_type = file.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&file.file_name)
                .first_or_octet_stream()
                .to_string()
        });

        tracing::debug!(
            "[HttpVideoApi] Uploading {} ({} bytes, {})",
            file.file_name,
            file.content.len(),
            content_type
        );

        let part = Part::bytes(file.content)
            .file_name(file.file_name)
            .mime_str(&content_type)
            .map_err(|e| ApiError::invalid_request(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        self.send_lenient(
            self.client
                .post(self.endpoints.upload_video())
                .multipart(form),
        )
        .await
    }
}
