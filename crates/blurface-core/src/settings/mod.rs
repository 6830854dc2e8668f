//! Settings models and their mappings to the remote API shapes.
//!
//! Local settings always hold the last values the service confirmed. Partial
//! `*Update` values describe a requested change; they are translated to the
//! wire payload before the remote call and merged locally only after it
//! succeeds.

mod blur;
mod detection;
mod display;

pub use blur::{BlurMethod, BlurSettings, BlurSettingsUpdate, FaceSelection};
pub use detection::{DetectionSettings, DetectionSettingsUpdate};
pub use display::{DisplaySettings, DisplaySettingsUpdate};
