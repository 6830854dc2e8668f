//! Settings synchronizer.
//!
//! Blur and detection settings are translated to the remote shape, sent, and
//! merged locally only once the service has acknowledged them. Display
//! settings never leave the client.

use std::sync::Arc;

use blurface_core::api::VideoProcessingApi;
use blurface_core::error::{ActionError, ApiError};
use blurface_core::settings::{BlurSettingsUpdate, DetectionSettingsUpdate, DisplaySettingsUpdate};

use crate::coordinator::{ActionCoordinator, ActionKind, BusyRelease};
use crate::store::{Mutation, SessionStore};

#[derive(Clone)]
pub struct SettingsSynchronizer {
    api: Arc<dyn VideoProcessingApi>,
    store: SessionStore,
    coordinator: ActionCoordinator,
}

impl SettingsSynchronizer {
    pub fn new(
        api: Arc<dyn VideoProcessingApi>,
        store: SessionStore,
        coordinator: ActionCoordinator,
    ) -> Self {
        Self {
            api,
            store,
            coordinator,
        }
    }

    /// Sends a blur settings change to the active session.
    ///
    /// Does nothing without an active session or for an empty update. On
    /// failure the local settings are left untouched and the error is both
    /// surfaced and returned.
    pub async fn update_blur_settings(&self, update: BlurSettingsUpdate) -> Result<(), ActionError> {
        if update.is_empty() {
            tracing::debug!("[Settings] Empty blur update ignored");
            return Ok(());
        }

        let confirmed = self
            .coordinator
            .run_for_session(
                ActionKind::UpdateBlurSettings,
                BusyRelease::Immediate,
                |session_id| async move {
                    self.api
                        .update_blur_settings(&session_id, &update.to_payload())
                        .await?;
                    tracing::info!("[Settings] Blur settings confirmed for session {}", session_id);
                    self.store.commit(Mutation::SetBlurSettings(update));
                    Ok::<_, ApiError>(())
                },
            )
            .await?;

        if confirmed.is_none() {
            tracing::debug!("[Settings] No active session, blur update ignored");
        }
        Ok(())
    }

    /// Sends a detection settings change to the active session.
    ///
    /// Same contract as [`Self::update_blur_settings`], except that the full
    /// settings (confirmed values with `update` applied) are always sent,
    /// since the service resets omitted fields. Out-of-range values are
    /// refused before any remote call.
    pub async fn update_detection_settings(
        &self,
        update: DetectionSettingsUpdate,
    ) -> Result<(), ActionError> {
        let confirmed = self
            .coordinator
            .run_for_session(
                ActionKind::UpdateDetectionSettings,
                BusyRelease::Immediate,
                |session_id| async move {
                    update.validate()?;
                    let settings = self.store.detection_settings().merged(&update);
                    self.api
                        .update_detection_settings(&session_id, &settings.to_payload())
                        .await?;
                    tracing::info!(
                        "[Settings] Detection settings confirmed for session {}",
                        session_id
                    );
                    self.store
                        .commit(Mutation::SetDetectionSettings(settings.into()));
                    Ok::<_, ApiError>(())
                },
            )
            .await?;

        if confirmed.is_none() {
            tracing::debug!("[Settings] No active session, detection update ignored");
        }
        Ok(())
    }

    /// Local-only merge.
    pub fn update_display_settings(&self, update: DisplaySettingsUpdate) {
        self.store.commit(Mutation::SetDisplaySettings(update));
    }
}
