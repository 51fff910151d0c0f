//! Emotion Sampling Loop
//!
//! Polls the expression detector on a fixed cadence and turns each result into:
//! - An anger reading and rising-edge check
//! - A debounced alert request
//! - A display snapshot (percentage, dominant emotion, palette, overlay)

mod config;
mod display;
mod sampler;

pub use config::SessionConfig;
pub use display::{DisplaySnapshot, Status};
pub use sampler::{EmotionSession, RunSummary, TickOutcome};

use camera_capture::CameraError;
use expression::ExpressionError;
use thiserror::Error;

/// Per-tick failures. The loop logs these and moves on.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Frame capture failed: {0}")]
    Camera(#[from] CameraError),

    #[error("Detection failed: {0}")]
    Detector(#[from] ExpressionError),
}
