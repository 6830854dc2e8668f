use serde::{Deserialize, Serialize};

use crate::api::wire::DetectionSettingsPayload;
use crate::error::ApiError;

/// Face detector settings confirmed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// Minimum detector confidence, in `[0, 1]`
    pub min_confidence: f32,
    /// Detector model: `0` short range, `1` full range
    pub model_selection: u8,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            model_selection: 1,
        }
    }
}

impl DetectionSettings {
    /// Shallow merge: fields absent from `update` keep their current value.
    pub fn merge(&mut self, update: &DetectionSettingsUpdate) {
        if let Some(min_confidence) = update.min_confidence {
            self.min_confidence = min_confidence;
        }
        if let Some(model_selection) = update.model_selection {
            self.model_selection = model_selection;
        }
    }

    /// Copy of `self` with `update` applied.
    pub fn merged(&self, update: &DetectionSettingsUpdate) -> Self {
        let mut settings = *self;
        settings.merge(update);
        settings
    }

    /// Complete remote body. The service resets omitted fields to its own
    /// defaults, so both fields are always sent.
    pub fn to_payload(&self) -> DetectionSettingsPayload {
        DetectionSettingsPayload {
            min_confidence: Some(self.min_confidence),
            model_selection: Some(self.model_selection),
        }
    }
}

impl From<DetectionSettings> for DetectionSettingsUpdate {
    fn from(settings: DetectionSettings) -> Self {
        Self {
            min_confidence: Some(settings.min_confidence),
            model_selection: Some(settings.model_selection),
        }
    }
}

/// Requested change to the detection settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionSettingsUpdate {
    pub min_confidence: Option<f32>,
    pub model_selection: Option<u8>,
}

impl DetectionSettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }

    pub fn with_model_selection(mut self, model_selection: u8) -> Self {
        self.model_selection = Some(model_selection);
        self
    }

    /// Rejects values the service could never apply.
    pub fn validate(&self) -> Result<(), ApiError> {
        match self.min_confidence {
            Some(value) if !(0.0..=1.0).contains(&value) => Err(ApiError::invalid_request(
                format!("min_confidence must be within [0, 1], got {}", value),
            )),
            _ => Ok(()),
        }
    }

    /// Maps every local field onto the remote `PUT /detection-settings` body.
    pub fn to_payload(&self) -> DetectionSettingsPayload {
        DetectionSettingsPayload {
            min_confidence: self.min_confidence,
            model_selection: self.model_selection,
        }
    }
}
