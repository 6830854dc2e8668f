//! Application layer for Blurface.
//!
//! Owns the client state of one processing session and coordinates the
//! remote calls that change it. Presentation code reads from the
//! [`SessionStore`] and [`SessionViews`], and acts through [`SessionUseCase`]
//! and [`SettingsSynchronizer`].

pub mod coordinator;
pub mod polling;
pub mod session_usecase;
pub mod settings_sync;
pub mod store;
pub mod views;

pub use coordinator::{ActionCoordinator, ActionKind, BusyRelease, DOWNLOAD_BUSY_HOLD};
pub use polling::{DetectionPoller, MIN_POLL_PERIOD};
pub use session_usecase::SessionUseCase;
pub use settings_sync::SettingsSynchronizer;
pub use store::{Mutation, SessionStore, StoreState};
pub use views::{CacheBuster, NO_SOURCE_LABEL, SessionViews};
