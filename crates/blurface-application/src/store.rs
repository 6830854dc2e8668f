//! Client state store.
//!
//! All state lives in one explicitly constructed `SessionStore`. It is only
//! changed through [`Mutation`]s, which keeps every write visible in one place
//! and makes each transition testable on a plain `StoreState`.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use blurface_core::media::{Detections, VideoInfo, Webcam};
use blurface_core::session::{Session, SourceDescriptor};
use blurface_core::settings::{
    BlurSettings, BlurSettingsUpdate, DetectionSettings, DetectionSettingsUpdate, DisplaySettings,
    DisplaySettingsUpdate,
};

/// Everything the presentation layer renders from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreState {
    pub session: Session,
    /// Last blur settings confirmed by the service
    pub blur_settings: BlurSettings,
    /// Last detection settings confirmed by the service
    pub detection_settings: DetectionSettings,
    pub display_settings: DisplaySettings,
    pub webcams: Vec<Webcam>,
    pub video_info: Option<VideoInfo>,
    pub detections: Detections,
    /// Shared busy flag; last write wins
    pub loading: bool,
    /// Shared error slot; last write wins
    pub error: Option<String>,
}

/// Named state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Enter `Active` with a confirmed id and the requested descriptor.
    ActivateSession { id: String, source: SourceDescriptor },
    /// Back to `Empty`; also clears the video info and the detections.
    ResetSession,
    /// Shallow merge of confirmed blur settings.
    SetBlurSettings(BlurSettingsUpdate),
    /// Shallow merge of confirmed detection settings.
    SetDetectionSettings(DetectionSettingsUpdate),
    SetDisplaySettings(DisplaySettingsUpdate),
    SetWebcams(Vec<Webcam>),
    SetVideoInfo(Option<VideoInfo>),
    SetDetections(Detections),
    SetLoading(bool),
    SetError(Option<String>),
}

impl Mutation {
    fn name(&self) -> &'static str {
        match self {
            Self::ActivateSession { .. } => "ACTIVATE_SESSION",
            Self::ResetSession => "RESET_SESSION",
            Self::SetBlurSettings(_) => "SET_BLUR_SETTINGS",
            Self::SetDetectionSettings(_) => "SET_DETECTION_SETTINGS",
            Self::SetDisplaySettings(_) => "SET_DISPLAY_SETTINGS",
            Self::SetWebcams(_) => "SET_WEBCAMS",
            Self::SetVideoInfo(_) => "SET_VIDEO_INFO",
            Self::SetDetections(_) => "SET_DETECTIONS",
            Self::SetLoading(_) => "SET_LOADING",
            Self::SetError(_) => "SET_ERROR",
        }
    }
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::ActivateSession { id, source } => {
                self.session = Session::active(id, source);
            }
            Mutation::ResetSession => {
                self.session = Session::Empty;
                self.video_info = None;
                self.detections = Detections::default();
            }
            Mutation::SetBlurSettings(update) => self.blur_settings.merge(&update),
            Mutation::SetDetectionSettings(update) => self.detection_settings.merge(&update),
            Mutation::SetDisplaySettings(update) => self.display_settings.merge(&update),
            Mutation::SetWebcams(webcams) => self.webcams = webcams,
            Mutation::SetVideoInfo(info) => self.video_info = info,
            Mutation::SetDetections(detections) => self.detections = detections,
            Mutation::SetLoading(loading) => self.loading = loading,
            Mutation::SetError(error) => self.error = error,
        }
    }
}

/// Shared handle to the client state.
///
/// Cloning yields another handle to the same state. Locks are never held
/// across an await point.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    state: Arc<RwLock<StoreState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a mutation.
    pub fn commit(&self, mutation: Mutation) {
        tracing::debug!(target: "blurface::store", "{}", mutation.name());
        self.write_lock().apply(mutation);
    }

    /// Applies `mutation` only if `guard` holds on the current state, under the
    /// same lock. Returns whether it was applied.
    pub fn commit_if<F>(&self, guard: F, mutation: Mutation) -> bool
    where
        F: FnOnce(&StoreState) -> bool,
    {
        let mut state = self.write_lock();
        if !guard(&state) {
            return false;
        }
        tracing::debug!(target: "blurface::store", "{}", mutation.name());
        state.apply(mutation);
        true
    }

    /// Runs `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.read_lock())
    }

    pub fn snapshot(&self) -> StoreState {
        self.read_lock().clone()
    }

    pub fn session(&self) -> Session {
        self.read(|s| s.session.clone())
    }

    pub fn session_id(&self) -> Option<String> {
        self.read(|s| s.session.id().map(str::to_string))
    }

    pub fn blur_settings(&self) -> BlurSettings {
        self.read(|s| s.blur_settings.clone())
    }

    pub fn detection_settings(&self) -> DetectionSettings {
        self.read(|s| s.detection_settings)
    }

    pub fn display_settings(&self) -> DisplaySettings {
        self.read(|s| s.display_settings)
    }

    pub fn loading(&self) -> bool {
        self.read(|s| s.loading)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blurface_core::media::FaceBox;
    use blurface_core::settings::{BlurMethod, FaceSelection};

    fn active_state() -> StoreState {
        let mut state = StoreState::new();
        state.apply(Mutation::ActivateSession {
            id: "abc".to_string(),
            source: SourceDescriptor::file("/tmp/a.mp4"),
        });
        state.apply(Mutation::SetVideoInfo(Some(VideoInfo {
            filename: "a.mp4".to_string(),
            ..Default::default()
        })));
        state.apply(Mutation::SetDetections(Detections {
            faces: vec![FaceBox {
                bbox: Default::default(),
                keypoints: Default::default(),
                score: 0.9,
                face_id: Some(0),
            }],
            frame_id: 12,
            timestamp: 3.0,
            width: 640,
            height: 480,
        }));
        state
    }

    #[test]
    fn test_initial_state() {
        let state = StoreState::new();
        assert_eq!(state.session, Session::Empty);
        assert_eq!(state.blur_settings, BlurSettings::default());
        assert_eq!(state.display_settings, DisplaySettings::default());
        assert!(state.webcams.is_empty());
        assert!(state.video_info.is_none());
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_reset_session_clears_session_data() {
        let mut state = active_state();
        state.apply(Mutation::ResetSession);

        assert_eq!(state.session, Session::Empty);
        assert!(state.video_info.is_none());
        assert_eq!(state.detections, Detections::default());
    }

    #[test]
    fn test_reset_session_is_idempotent() {
        let mut once = active_state();
        once.apply(Mutation::ResetSession);

        let mut twice = active_state();
        twice.apply(Mutation::ResetSession);
        twice.apply(Mutation::ResetSession);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_reset_session_keeps_settings() {
        let mut state = active_state();
        state.apply(Mutation::SetBlurSettings(
            BlurSettingsUpdate::new().with_method(BlurMethod::Solid),
        ));
        state.apply(Mutation::ResetSession);
        assert_eq!(state.blur_settings.method, BlurMethod::Solid);
    }

    #[test]
    fn test_blur_settings_merge_is_shallow() {
        let mut state = StoreState::new();
        state.apply(Mutation::SetBlurSettings(
            BlurSettingsUpdate::new().with_selected_faces(FaceSelection::only([2])),
        ));
        assert_eq!(state.blur_settings.method, BlurMethod::Gaussian);
        assert_eq!(state.blur_settings.intensity, 35);
        assert_eq!(state.blur_settings.selected_faces, FaceSelection::only([2]));
    }

    #[test]
    fn test_store_handles_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        store.commit(Mutation::SetError(Some("boom".to_string())));
        assert_eq!(other.error().as_deref(), Some("boom"));
    }

    #[test]
    fn test_commit_if_respects_guard() {
        let store = SessionStore::new();
        let applied = store.commit_if(|s| s.session.is_active(), Mutation::SetLoading(true));
        assert!(!applied);
        assert!(!store.loading());

        let applied = store.commit_if(|s| !s.session.is_active(), Mutation::SetLoading(true));
        assert!(applied);
        assert!(store.loading());
    }
}
