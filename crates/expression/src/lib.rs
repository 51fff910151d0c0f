//! Facial Expression Readings
//!
//! Turns the output of an external face/expression detector into the values
//! the sampling loop acts on:
//! - Detector provider seam and detection types
//! - Anger score, display percentage, and dominant emotion per face
//! - Rising-edge tracking of the "is angry" state

pub mod analysis;
pub mod config;
pub mod detector;
pub mod state;

pub use analysis::{anger_percentage, capitalize, dominant_emotion, EmotionReading};
pub use config::ExpressionConfig;
pub use detector::{
    DetectOptions, Expressions, ExpressionDetector, FaceBox, FaceDetection, ReplayDetector,
    ScriptedDetector,
};
pub use state::AngerTracker;

use thiserror::Error;

/// Expression error types
#[derive(Error, Debug)]
pub enum ExpressionError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Detector timed out after {0}ms")]
    Timeout(u64),

    #[error("Replay file error: {0}")]
    Replay(String),
}
