//! Session use case implementation.
//!
//! `SessionUseCase` owns the client state for one processing session and
//! drives every remote-backed action against it: the session lifecycle, media
//! lookups (webcams, video info, upload), frame capture, download and
//! detection polling.

use std::sync::Arc;

use blurface_core::api::{
    ApiEndpoints, CreateSessionRequest, DownloadRequest, DownloadTrigger, FrameQuery, UploadFile,
    UploadedVideo, VideoProcessingApi,
};
use blurface_core::error::{ActionError, ApiError, ApiResult};
use blurface_core::media::{Frame, ServiceStatus, VideoInfo};
use blurface_core::session::SourceDescriptor;
use chrono::Utc;

use crate::coordinator::{ActionCoordinator, ActionKind, BusyRelease, DOWNLOAD_BUSY_HOLD};
use crate::settings_sync::SettingsSynchronizer;
use crate::store::{Mutation, SessionStore};
use crate::views::SessionViews;

/// Use case for one client of the processing service.
///
/// # Responsibilities
///
/// - Creating and closing the remote session, mirroring it in the store
/// - Loading webcams and video metadata, uploading videos
/// - Capturing single frames and polling detections
/// - Handing the processed video to a [`DownloadTrigger`]
///
/// Remote-backed actions run one at a time through the [`ActionCoordinator`];
/// detection polling bypasses it.
pub struct SessionUseCase {
    api: Arc<dyn VideoProcessingApi>,
    downloads: Arc<dyn DownloadTrigger>,
    store: SessionStore,
    coordinator: ActionCoordinator,
    settings: SettingsSynchronizer,
    views: SessionViews,
}

impl SessionUseCase {
    /// Creates a use case with an empty store.
    pub fn new(api: Arc<dyn VideoProcessingApi>, downloads: Arc<dyn DownloadTrigger>) -> Self {
        let store = SessionStore::new();
        let coordinator = ActionCoordinator::new(store.clone());
        let settings = SettingsSynchronizer::new(api.clone(), store.clone(), coordinator.clone());
        let views = SessionViews::new(store.clone(), api.endpoints().clone());

        Self {
            api,
            downloads,
            store,
            coordinator,
            settings,
            views,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn settings(&self) -> &SettingsSynchronizer {
        &self.settings
    }

    pub fn views(&self) -> &SessionViews {
        &self.views
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        self.api.endpoints()
    }

    /// Service liveness. Not tracked in the store.
    pub async fn status(&self) -> ApiResult<ServiceStatus> {
        self.api.status().await
    }

    // ============================================================================
    // Session lifecycle
    // ============================================================================

    /// Opens a remote session for `source` and returns its id.
    ///
    /// The requested descriptor is stored as-is next to the id the service
    /// returned. A refusal leaves the store without a session.
    pub async fn create_session(&self, source: SourceDescriptor) -> Result<String, ActionError> {
        self.coordinator
            .run(ActionKind::CreateSession, BusyRelease::Immediate, async {
                let request = CreateSessionRequest::from(&source);
                tracing::debug!("[SessionUseCase] Creating session for {:?}", request);

                let session_id = self.api.create_session(&request).await?.into_session_id()?;

                if let Some(previous) = self.store.session_id() {
                    tracing::warn!(
                        "[SessionUseCase] Replacing active session {} with {}",
                        previous,
                        session_id
                    );
                }

                self.store.commit(Mutation::ActivateSession {
                    id: session_id.clone(),
                    source,
                });
                tracing::info!("[SessionUseCase] Session {} created", session_id);
                Ok::<_, ApiError>(session_id)
            })
            .await
    }

    /// Closes the active session.
    ///
    /// Without a session this does nothing, not even clearing the error slot.
    /// A failed close keeps the session and surfaces the error.
    pub async fn close_session(&self) {
        if self.store.session_id().is_none() {
            tracing::debug!("[SessionUseCase] No active session to close");
            return;
        }

        let closed = self
            .coordinator
            .run_for_session(
                ActionKind::CloseSession,
                BusyRelease::Immediate,
                |session_id| async move {
                    self.api.close_session(&session_id).await?;
                    self.store.commit(Mutation::ResetSession);
                    tracing::info!("[SessionUseCase] Session {} closed", session_id);
                    Ok::<_, ApiError>(())
                },
            )
            .await;

        if closed.is_err() {
            tracing::debug!("[SessionUseCase] Session kept after failed close");
        }
    }

    /// Closes whatever session is still open before the client goes away.
    pub async fn shutdown(&self) {
        if self.views.has_active_session() {
            tracing::info!("[SessionUseCase] Closing session on shutdown");
            self.close_session().await;
        }
    }

    // ============================================================================
    // Media
    // ============================================================================

    /// Refreshes the webcam list. Failures are surfaced only.
    pub async fn load_webcams(&self) {
        let _ = self
            .coordinator
            .run(ActionKind::LoadWebcams, BusyRelease::Immediate, async {
                let webcams = self.api.list_webcams().await?;
                tracing::debug!("[SessionUseCase] {} webcam(s) available", webcams.len());
                self.store.commit(Mutation::SetWebcams(webcams));
                Ok::<_, ApiError>(())
            })
            .await;
    }

    /// Fetches and stores the descriptor of a server-side video file.
    pub async fn load_video_info(&self, file_path: &str) -> Result<VideoInfo, ActionError> {
        self.coordinator
            .run(ActionKind::LoadVideoInfo, BusyRelease::Immediate, async {
                let info = self.api.video_info(file_path).await?;
                self.store.commit(Mutation::SetVideoInfo(Some(info.clone())));
                Ok::<_, ApiError>(info)
            })
            .await
    }

    /// Uploads a video; the returned `file_path` can be used to open a file
    /// session.
    pub async fn upload_video(&self, file: UploadFile) -> Result<UploadedVideo, ActionError> {
        self.coordinator
            .run(ActionKind::UploadVideo, BusyRelease::Immediate, async {
                tracing::info!(
                    "[SessionUseCase] Uploading {} ({} bytes)",
                    file.file_name,
                    file.content.len()
                );
                let uploaded = self.api.upload_video(file).await?.into_uploaded()?;
                self.store
                    .commit(Mutation::SetVideoInfo(uploaded.video_info.clone()));
                Ok::<_, ApiError>(uploaded)
            })
            .await
    }

    /// Hands the processed video of the active session to the download
    /// trigger. Returns `None` without a session.
    ///
    /// The busy flag stays up for [`DOWNLOAD_BUSY_HOLD`] after the hand-off,
    /// since the download itself reports no completion.
    pub async fn download_video(&self) -> Result<Option<DownloadRequest>, ActionError> {
        self.coordinator
            .run_for_session(
                ActionKind::DownloadVideo,
                BusyRelease::Deferred(DOWNLOAD_BUSY_HOLD),
                |session_id| async move {
                    let request =
                        DownloadRequest::for_session(self.api.endpoints(), &session_id, Utc::now());
                    self.downloads.trigger(&request).await?;
                    tracing::info!("[SessionUseCase] Download started: {}", request.file_name);
                    Ok::<_, ApiError>(request)
                },
            )
            .await
    }

    // ============================================================================
    // Frames and detections
    // ============================================================================

    /// Fetches one processed frame with the current display settings and
    /// stores its detections. Returns `None` without a session.
    pub async fn capture_frame(&self) -> Result<Option<Frame>, ActionError> {
        self.coordinator
            .run_for_session(
                ActionKind::CaptureFrame,
                BusyRelease::Immediate,
                |session_id| async move {
                    let query = FrameQuery::from(&self.store.display_settings());
                    let frame = self.api.get_frame(&session_id, &query).await?;
                    self.store
                        .commit(Mutation::SetDetections(frame.detections.clone()));
                    Ok::<_, ApiError>(frame)
                },
            )
            .await
    }

    /// One detection poll.
    ///
    /// Never raises the busy flag or touches the error slot: failures are only
    /// logged. A result that arrives after the session changed is dropped.
    pub async fn fetch_detections(&self) {
        let Some(session_id) = self.store.session_id() else {
            return;
        };

        let response = match self.api.get_detections(&session_id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("[DetectionPoller] {}", ActionError::DetectionFetch(e));
                return;
            }
        };

        if !response.success {
            tracing::debug!("[DetectionPoller] No detections available for {}", session_id);
            return;
        }

        let detections = response.detections;
        let previous_frame = self.store.read(|state| state.detections.frame_id);
        if detections.frame_id < previous_frame {
            tracing::warn!(
                "[DetectionPoller] frame_id went back from {} to {}",
                previous_frame,
                detections.frame_id
            );
        }

        let applied = self.store.commit_if(
            |state| state.session.id() == Some(session_id.as_str()),
            Mutation::SetDetections(detections),
        );
        if !applied {
            tracing::debug!("[DetectionPoller] Session changed, stale detections dropped");
        }
    }
}
