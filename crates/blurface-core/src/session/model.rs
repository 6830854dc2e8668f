use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of input feeding a processing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceType {
    Webcam,
    File,
}

/// Identifies the input stream of a session.
///
/// A webcam source only carries its device id and a file source only carries
/// its path, so an irrelevant field can never be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source_type", rename_all = "lowercase")]
pub enum SourceDescriptor {
    Webcam { device_id: u32 },
    File { file_path: String },
}

impl SourceDescriptor {
    pub fn webcam(device_id: u32) -> Self {
        Self::Webcam { device_id }
    }

    pub fn file(file_path: impl Into<String>) -> Self {
        Self::File {
            file_path: file_path.into(),
        }
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            Self::Webcam { .. } => SourceType::Webcam,
            Self::File { .. } => SourceType::File,
        }
    }

    /// Device id sent on the wire; `0` for file sources.
    pub fn device_id(&self) -> u32 {
        match self {
            Self::Webcam { device_id } => *device_id,
            Self::File { .. } => 0,
        }
    }

    /// File path sent on the wire; empty for webcam sources.
    pub fn file_path(&self) -> &str {
        match self {
            Self::Webcam { .. } => "",
            Self::File { file_path } => file_path,
        }
    }
}

/// The client's view of the remote processing session.
///
/// `Empty` -> `Active` on a confirmed create, `Active` -> `Empty` on a
/// confirmed close. An id without an active flag (or the reverse) cannot be
/// represented.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Session {
    #[default]
    Empty,
    Active {
        id: String,
        source: SourceDescriptor,
    },
}

impl Session {
    pub fn active(id: impl Into<String>, source: SourceDescriptor) -> Self {
        Self::Active {
            id: id.into(),
            source,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Active { id, .. } => Some(id),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn source(&self) -> Option<&SourceDescriptor> {
        match self {
            Self::Empty => None,
            Self::Active { source, .. } => Some(source),
        }
    }

    pub fn source_type(&self) -> Option<SourceType> {
        self.source().map(SourceDescriptor::source_type)
    }
}
