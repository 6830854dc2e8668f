//! Periodic detection polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::session_usecase::SessionUseCase;

/// Shortest accepted polling period.
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(1);

pub struct DetectionPoller;

impl DetectionPoller {
    /// Polls detections every `period` until `cancel` fires.
    ///
    /// Ticks without an active session are skipped. A slow poll delays the
    /// next tick instead of queueing a burst. `period` is raised to
    /// [`MIN_POLL_PERIOD`] if shorter.
    pub fn spawn(
        usecase: Arc<SessionUseCase>,
        period: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let period = if period < MIN_POLL_PERIOD {
            tracing::warn!(
                target: "detection_poll",
                "Poll period {:?} too short, using {:?}",
                period,
                MIN_POLL_PERIOD
            );
            MIN_POLL_PERIOD
        } else {
            period
        };

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(target: "detection_poll", "Poller started ({:?} interval)", period);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => usecase.fetch_detections().await,
                }
            }

            tracing::info!(target: "detection_poll", "Poller stopped");
        })
    }
}
