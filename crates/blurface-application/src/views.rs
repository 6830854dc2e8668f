//! Values derived from the store for presentation.

use std::sync::atomic::{AtomicU64, Ordering};

use blurface_core::api::ApiEndpoints;
use blurface_core::session::SourceDescriptor;

use crate::store::{SessionStore, StoreState};

pub const NO_SOURCE_LABEL: &str = "No source";

/// Stream URL of the active session, or `None` without a session id.
pub fn stream_url(state: &StoreState, endpoints: &ApiEndpoints, cache_token: u64) -> Option<String> {
    let session_id = state.session.id()?;
    Some(endpoints.stream_url(session_id, &state.display_settings, cache_token))
}

pub fn has_active_session(state: &StoreState) -> bool {
    state.session.is_active() && state.session.id().is_some()
}

/// Human-readable label of the current input.
pub fn current_source(state: &StoreState) -> String {
    match state.session.source() {
        Some(SourceDescriptor::Webcam { device_id }) => state
            .webcams
            .iter()
            .find(|webcam| webcam.device_id == *device_id)
            .map(|webcam| webcam.name.clone())
            .unwrap_or_else(|| format!("Webcam {}", device_id)),
        Some(SourceDescriptor::File { file_path }) => state
            .video_info
            .as_ref()
            .map(|info| info.filename.as_str())
            .filter(|filename| !filename.is_empty())
            .unwrap_or(file_path.as_str())
            .to_string(),
        None => NO_SOURCE_LABEL.to_string(),
    }
}

/// Strictly increasing cache-busting tokens.
///
/// Tokens are milliseconds since the Unix epoch, bumped by one whenever the
/// clock has not moved since the previous token.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: AtomicU64,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_token(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

/// Live views over a store.
#[derive(Debug)]
pub struct SessionViews {
    store: SessionStore,
    endpoints: ApiEndpoints,
    cache_buster: CacheBuster,
}

impl SessionViews {
    pub fn new(store: SessionStore, endpoints: ApiEndpoints) -> Self {
        Self {
            store,
            endpoints,
            cache_buster: CacheBuster::new(),
        }
    }

    /// Builds a fresh stream URL; two calls never return the same URL.
    pub fn stream_url(&self) -> Option<String> {
        self.store.read(|state| {
            state.session.id()?;
            stream_url(state, &self.endpoints, self.cache_buster.next_token())
        })
    }

    pub fn has_active_session(&self) -> bool {
        self.store.read(has_active_session)
    }

    pub fn current_source(&self) -> String {
        self.store.read(current_source)
    }
}
