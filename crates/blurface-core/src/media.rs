//! Records describing inputs and outputs of the processing service.
//!
//! These are replaced wholesale whenever the service reports a new value and
//! are never merged field by field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A capture device known to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webcam {
    pub device_id: u32,
    pub name: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub fps: f64,
}

/// Descriptor of an uploaded or referenced video file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<u64>,
    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Duration formatted as `HH:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: i32,
    pub ymin: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub xmax: i32,
    #[serde(default)]
    pub ymax: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: i32,
    pub y: i32,
}

/// One detected face in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub bbox: BoundingBox,
    #[serde(default)]
    pub keypoints: BTreeMap<String, Keypoint>,
    #[serde(default)]
    pub score: f64,
    /// Index usable in a face selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_id: Option<u32>,
}

/// Detector output for the most recent frame.
///
/// `frame_id` and `timestamp` normally increase between polls, but a
/// regression is accepted as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Detections {
    #[serde(default)]
    pub faces: Vec<FaceBox>,
    #[serde(default)]
    pub frame_id: u64,
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl Detections {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// A processed frame: decoded JPEG bytes plus the detections it was drawn from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub jpeg: Vec<u8>,
    pub detections: Detections,
}

/// Liveness report of the processing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub version: String,
    #[serde(default)]
    pub timestamp: f64,
}
