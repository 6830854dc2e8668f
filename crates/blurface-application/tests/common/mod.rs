#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blurface_application::SessionUseCase;
use blurface_core::api::{
    ApiEndpoints, BlurSettingsPayload, CreateSessionRequest, CreateSessionResponse,
    DetectionSettingsPayload, DetectionsResponse, DownloadRequest, DownloadTrigger, FrameQuery,
    UploadFile, UploadResponse, VideoProcessingApi,
};
use blurface_core::error::{ApiError, ApiResult};
use blurface_core::media::{Detections, Frame, ServiceStatus, VideoInfo, Webcam};

pub const BASE_URL: &str = "http://blur.test";

/// Remote calls seen by [`MockApi`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Status,
    CreateSession(CreateSessionRequest),
    CloseSession(String),
    UpdateBlurSettings(String, BlurSettingsPayload),
    UpdateDetectionSettings(String, DetectionSettingsPayload),
    GetFrame(String, FrameQuery),
    GetDetections(String),
    ListWebcams,
    VideoInfo(String),
    UploadVideo(String),
}

type Hook = Box<dyn FnOnce() + Send>;

/// Recording mock of the processing service.
///
/// Every operation succeeds by default; individual results can be replaced.
pub struct MockApi {
    endpoints: ApiEndpoints,
    calls: Mutex<Vec<Call>>,
    create_result: Mutex<ApiResult<CreateSessionResponse>>,
    close_result: Mutex<ApiResult<()>>,
    blur_result: Mutex<ApiResult<()>>,
    detection_settings_result: Mutex<ApiResult<()>>,
    frame_result: Mutex<ApiResult<Frame>>,
    detections_queue: Mutex<VecDeque<ApiResult<DetectionsResponse>>>,
    detections_hook: Mutex<Option<Hook>>,
    webcams_result: Mutex<ApiResult<Vec<Webcam>>>,
    video_info_result: Mutex<ApiResult<VideoInfo>>,
    upload_result: Mutex<ApiResult<UploadResponse>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            endpoints: ApiEndpoints::new(BASE_URL),
            calls: Mutex::new(Vec::new()),
            create_result: Mutex::new(Ok(CreateSessionResponse {
                success: true,
                session_id: Some("abc".to_string()),
                error: None,
            })),
            close_result: Mutex::new(Ok(())),
            blur_result: Mutex::new(Ok(())),
            detection_settings_result: Mutex::new(Ok(())),
            frame_result: Mutex::new(Ok(Frame::default())),
            detections_queue: Mutex::new(VecDeque::new()),
            detections_hook: Mutex::new(None),
            webcams_result: Mutex::new(Ok(Vec::new())),
            video_info_result: Mutex::new(Ok(VideoInfo::default())),
            upload_result: Mutex::new(Ok(UploadResponse::default())),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn set_create_result(&self, result: ApiResult<CreateSessionResponse>) {
        *self.create_result.lock().unwrap() = result;
    }

    pub fn set_close_result(&self, result: ApiResult<()>) {
        *self.close_result.lock().unwrap() = result;
    }

    pub fn set_blur_result(&self, result: ApiResult<()>) {
        *self.blur_result.lock().unwrap() = result;
    }

    pub fn set_detection_settings_result(&self, result: ApiResult<()>) {
        *self.detection_settings_result.lock().unwrap() = result;
    }

    pub fn set_frame_result(&self, result: ApiResult<Frame>) {
        *self.frame_result.lock().unwrap() = result;
    }

    pub fn push_detections(&self, result: ApiResult<DetectionsResponse>) {
        self.detections_queue.lock().unwrap().push_back(result);
    }

    /// Runs `hook` during the next detections request, before it answers.
    pub fn on_next_detections(&self, hook: impl FnOnce() + Send + 'static) {
        *self.detections_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn set_webcams_result(&self, result: ApiResult<Vec<Webcam>>) {
        *self.webcams_result.lock().unwrap() = result;
    }

    pub fn set_video_info_result(&self, result: ApiResult<VideoInfo>) {
        *self.video_info_result.lock().unwrap() = result;
    }

    pub fn set_upload_result(&self, result: ApiResult<UploadResponse>) {
        *self.upload_result.lock().unwrap() = result;
    }
}

#[async_trait]
impl VideoProcessingApi for MockApi {
    fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    async fn status(&self) -> ApiResult<ServiceStatus> {
        self.record(Call::Status);
        Ok(ServiceStatus {
            status: "ok".to_string(),
            version: "1.0.0".to_string(),
            timestamp: 0.0,
        })
    }

    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> ApiResult<CreateSessionResponse> {
        self.record(Call::CreateSession(request.clone()));
        self.create_result.lock().unwrap().clone()
    }

    async fn close_session(&self, session_id: &str) -> ApiResult<()> {
        self.record(Call::CloseSession(session_id.to_string()));
        self.close_result.lock().unwrap().clone()
    }

    async fn update_blur_settings(
        &self,
        session_id: &str,
        payload: &BlurSettingsPayload,
    ) -> ApiResult<()> {
        self.record(Call::UpdateBlurSettings(
            session_id.to_string(),
            payload.clone(),
        ));
        self.blur_result.lock().unwrap().clone()
    }

    async fn update_detection_settings(
        &self,
        session_id: &str,
        payload: &DetectionSettingsPayload,
    ) -> ApiResult<()> {
        self.record(Call::UpdateDetectionSettings(
            session_id.to_string(),
            *payload,
        ));
        self.detection_settings_result.lock().unwrap().clone()
    }

    async fn get_frame(&self, session_id: &str, query: &FrameQuery) -> ApiResult<Frame> {
        self.record(Call::GetFrame(session_id.to_string(), *query));
        self.frame_result.lock().unwrap().clone()
    }

    async fn get_detections(&self, session_id: &str) -> ApiResult<DetectionsResponse> {
        self.record(Call::GetDetections(session_id.to_string()));
        let hook = self.detections_hook.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        self.detections_queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DetectionsResponse::default()))
    }

    async fn list_webcams(&self) -> ApiResult<Vec<Webcam>> {
        self.record(Call::ListWebcams);
        self.webcams_result.lock().unwrap().clone()
    }

    async fn video_info(&self, file_path: &str) -> ApiResult<VideoInfo> {
        self.record(Call::VideoInfo(file_path.to_string()));
        self.video_info_result.lock().unwrap().clone()
    }

    async fn upload_video(&self, file: UploadFile) -> ApiResult<UploadResponse> {
        self.record(Call::UploadVideo(file.file_name));
        self.upload_result.lock().unwrap().clone()
    }
}

/// Records download hand-offs.
pub struct MockDownloadTrigger {
    requests: Mutex<Vec<DownloadRequest>>,
    result: Mutex<ApiResult<()>>,
}

impl MockDownloadTrigger {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            result: Mutex::new(Ok(())),
        }
    }

    pub fn requests(&self) -> Vec<DownloadRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn set_result(&self, result: ApiResult<()>) {
        *self.result.lock().unwrap() = result;
    }
}

#[async_trait]
impl DownloadTrigger for MockDownloadTrigger {
    async fn trigger(&self, request: &DownloadRequest) -> ApiResult<()> {
        self.requests.lock().unwrap().push(request.clone());
        self.result.lock().unwrap().clone()
    }
}

pub struct Harness {
    pub api: Arc<MockApi>,
    pub downloads: Arc<MockDownloadTrigger>,
    pub usecase: Arc<SessionUseCase>,
}

pub fn harness() -> Harness {
    let api = Arc::new(MockApi::new());
    let downloads = Arc::new(MockDownloadTrigger::new());
    let usecase = Arc::new(SessionUseCase::new(api.clone(), downloads.clone()));
    Harness {
        api,
        downloads,
        usecase,
    }
}

pub fn detections(frame_id: u64) -> DetectionsResponse {
    DetectionsResponse {
        success: true,
        detections: Detections {
            faces: Vec::new(),
            frame_id,
            timestamp: frame_id as f64 / 30.0,
            width: 640,
            height: 480,
        },
    }
}

pub fn transport_error() -> ApiError {
    ApiError::transport("connection refused")
}
