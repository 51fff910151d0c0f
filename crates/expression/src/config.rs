//! Expression configuration

use serde::{Deserialize, Serialize};

use crate::detector::DetectOptions;

/// Expression configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    /// Anger score above which the face counts as angry (strictly greater)
    pub anger_threshold: f32,

    /// Face detection confidence threshold
    pub min_confidence: f32,

    /// Detector input resolution (square)
    pub input_size: u32,

    /// Recorded detections to replay instead of a live detector
    pub replay_path: Option<String>,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            anger_threshold: 0.5,
            min_confidence: 0.5,
            input_size: 224,
            replay_path: None,
        }
    }
}

impl ExpressionConfig {
    /// Options passed to the detector on every call
    pub fn detect_options(&self) -> DetectOptions {
        DetectOptions {
            input_size: self.input_size,
            score_threshold: self.min_confidence,
        }
    }
}
