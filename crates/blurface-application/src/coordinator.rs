//! Busy/error bookkeeping around remote-backed actions.
//!
//! Every action run through the coordinator:
//! 1. waits for its turn (one action in flight per client, FIFO),
//! 2. raises the busy flag and clears the error slot,
//! 3. on failure writes "<description>: <detail>" into the error slot,
//! 4. lowers the busy flag however it ends, even if the future is dropped.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use blurface_core::error::{ActionError, ApiError, SettingsTarget};
use tokio::sync::Mutex;

use crate::store::{Mutation, SessionStore};

/// How long the busy flag stays up after a download was handed off.
pub const DOWNLOAD_BUSY_HOLD: Duration = Duration::from_millis(1000);

/// Remote-backed actions, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    CreateSession,
    CloseSession,
    UpdateBlurSettings,
    UpdateDetectionSettings,
    LoadWebcams,
    LoadVideoInfo,
    UploadVideo,
    DownloadVideo,
    CaptureFrame,
}

impl ActionKind {
    /// Wraps a contract failure into the matching taxonomy entry.
    pub fn wrap(self, err: ApiError) -> ActionError {
        match self {
            Self::CreateSession => ActionError::SessionCreation(err),
            Self::CloseSession => ActionError::SessionClose(err),
            Self::UpdateBlurSettings => ActionError::SettingsUpdate {
                target: SettingsTarget::Blur,
                source: err,
            },
            Self::UpdateDetectionSettings => ActionError::SettingsUpdate {
                target: SettingsTarget::Detection,
                source: err,
            },
            Self::LoadWebcams => ActionError::WebcamList(err),
            Self::LoadVideoInfo => ActionError::VideoInfo(err),
            Self::UploadVideo => ActionError::Upload(err),
            Self::DownloadVideo => ActionError::Download(err),
            Self::CaptureFrame => ActionError::FrameFetch(err),
        }
    }
}

/// When the busy flag is lowered once an action has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyRelease {
    Immediate,
    /// Lowered after the delay, unless a newer action raised it meanwhile.
    Deferred(Duration),
}

#[derive(Debug, Clone)]
pub struct ActionCoordinator {
    store: SessionStore,
    turn: Arc<Mutex<()>>,
    generation: Arc<AtomicU64>,
}

impl ActionCoordinator {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            turn: Arc::new(Mutex::new(())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Runs `action` under the busy/error protocol.
    ///
    /// `action` is lazy: it starts once the previous action has finished, so it
    /// must read any state it depends on from inside.
    pub async fn run<T, Fut>(
        &self,
        kind: ActionKind,
        release: BusyRelease,
        action: Fut,
    ) -> Result<T, ActionError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let _turn = self.turn.lock().await;
        let _scope = self.begin(kind, release);

        action.await.map_err(|err| self.surface(kind, err))
    }

    /// Like [`Self::run`], for actions that need the active session.
    ///
    /// The session id is read once the turn is granted. Without a session
    /// the action is skipped and returns `None`, leaving the busy flag and
    /// the error slot as they were.
    pub async fn run_for_session<T, F, Fut>(
        &self,
        kind: ActionKind,
        release: BusyRelease,
        action: F,
    ) -> Result<Option<T>, ActionError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let _turn = self.turn.lock().await;
        let Some(session_id) = self.store.session_id() else {
            tracing::debug!(action = ?kind, "no active session, action skipped");
            return Ok(None);
        };
        let _scope = self.begin(kind, release);

        action(session_id)
            .await
            .map(Some)
            .map_err(|err| self.surface(kind, err))
    }

    fn surface(&self, kind: ActionKind, err: ApiError) -> ActionError {
        let err = kind.wrap(err);
        tracing::error!(action = ?kind, "{}", err);
        self.store.commit(Mutation::SetError(Some(err.to_string())));
        err
    }

    fn begin(&self, kind: ActionKind, release: BusyRelease) -> BusyScope {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(action = ?kind, generation, "action started");

        self.store.commit(Mutation::SetLoading(true));
        self.store.commit(Mutation::SetError(None));

        BusyScope {
            store: self.store.clone(),
            generation_counter: Arc::clone(&self.generation),
            generation,
            release,
        }
    }
}

/// Lowers the busy flag when dropped.
struct BusyScope {
    store: SessionStore,
    generation_counter: Arc<AtomicU64>,
    generation: u64,
    release: BusyRelease,
}

impl Drop for BusyScope {
    fn drop(&mut self) {
        let delay = match self.release {
            BusyRelease::Immediate => {
                self.store.commit(Mutation::SetLoading(false));
                return;
            }
            BusyRelease::Deferred(delay) => delay,
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.store.commit(Mutation::SetLoading(false));
            return;
        };

        let store = self.store.clone();
        let counter = Arc::clone(&self.generation_counter);
        let generation = self.generation;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if counter.load(Ordering::SeqCst) == generation {
                store.commit(Mutation::SetLoading(false));
            } else {
                tracing::debug!(generation, "deferred busy reset skipped, newer action running");
            }
        });
    }
}
