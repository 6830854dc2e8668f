use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::api::wire::BlurSettingsPayload;

/// Rendering applied over detected faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BlurMethod {
    #[default]
    Gaussian,
    Pixelate,
    Solid,
}

/// Which detected faces get blurred.
///
/// On the wire `All` is `null` and `Only` is a list of face indices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<BTreeSet<u32>>", into = "Option<BTreeSet<u32>>")]
pub enum FaceSelection {
    #[default]
    All,
    Only(BTreeSet<u32>),
}

impl FaceSelection {
    pub fn only(faces: impl IntoIterator<Item = u32>) -> Self {
        Self::Only(faces.into_iter().collect())
    }

    pub fn includes(&self, face_index: u32) -> bool {
        match self {
            Self::All => true,
            Self::Only(faces) => faces.contains(&face_index),
        }
    }
}

impl From<Option<BTreeSet<u32>>> for FaceSelection {
    fn from(value: Option<BTreeSet<u32>>) -> Self {
        match value {
            None => Self::All,
            Some(faces) => Self::Only(faces),
        }
    }
}

impl From<FaceSelection> for Option<BTreeSet<u32>> {
    fn from(value: FaceSelection) -> Self {
        match value {
            FaceSelection::All => None,
            FaceSelection::Only(faces) => Some(faces),
        }
    }
}

/// Blur settings confirmed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurSettings {
    pub method: BlurMethod,
    pub intensity: u32,
    pub selected_faces: FaceSelection,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            method: BlurMethod::Gaussian,
            intensity: 35,
            selected_faces: FaceSelection::All,
        }
    }
}

impl BlurSettings {
    /// Shallow merge: fields absent from `update` keep their current value.
    pub fn merge(&mut self, update: &BlurSettingsUpdate) {
        if let Some(method) = update.method {
            self.method = method;
        }
        if let Some(intensity) = update.intensity {
            self.intensity = intensity;
        }
        if let Some(selected_faces) = &update.selected_faces {
            self.selected_faces = selected_faces.clone();
        }
    }
}

/// Requested change to the blur settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlurSettingsUpdate {
    pub method: Option<BlurMethod>,
    pub intensity: Option<u32>,
    pub selected_faces: Option<FaceSelection>,
}

impl BlurSettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: BlurMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_intensity(mut self, intensity: u32) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn with_selected_faces(mut self, selected_faces: FaceSelection) -> Self {
        self.selected_faces = Some(selected_faces);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.method.is_none() && self.intensity.is_none() && self.selected_faces.is_none()
    }

    /// Maps every local field onto the remote `PUT /blur-settings` body.
    pub fn to_payload(&self) -> BlurSettingsPayload {
        BlurSettingsPayload {
            method: self.method,
            intensity: self.intensity,
            selected_faces: self.selected_faces.clone(),
        }
    }
}

impl From<BlurSettings> for BlurSettingsUpdate {
    fn from(settings: BlurSettings) -> Self {
        Self {
            method: Some(settings.method),
            intensity: Some(settings.intensity),
            selected_faces: Some(settings.selected_faces),
        }
    }
}
