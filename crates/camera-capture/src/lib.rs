//! Camera Capture Library for Anger Watch
//!
//! Provides the media input side of the sampling loop:
//! - RGB video frames handed to the expression detector
//! - The `FrameSource` trait the loop pulls frames from
//! - Blank and still-image sources for demos and tests

pub mod frame;
pub mod source;

pub use frame::VideoFrame;
pub use source::{BlankSource, FrameSource, ImageSource};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open source: {0}")]
    Open(String),
}

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Still image to loop instead of a live device
    pub image_path: Option<String>,
    /// Preview is shown mirrored (selfie view)
    pub mirrored: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 560,
            image_path: None,
            mirrored: true,
        }
    }
}

impl CameraConfig {
    /// Open the frame source this configuration describes
    pub fn open(&self) -> Result<Box<dyn FrameSource + Send>, CameraError> {
        match &self.image_path {
            Some(path) => Ok(Box::new(ImageSource::open(path)?)),
            None => Ok(Box::new(BlankSource::new(self.width, self.height))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_webcam_request() {
        let config = CameraConfig::default();
        assert_eq!((config.width, config.height), (720, 560));
        assert!(config.mirrored);
    }

    #[test]
    fn test_open_blank_when_no_image() {
        let config = CameraConfig {
            width: 32,
            height: 24,
            ..Default::default()
        };
        let mut source = config.open().unwrap();
        let frame = source.next_frame().unwrap();
        assert_eq!((frame.width, frame.height), (32, 24));
    }

    #[test]
    fn test_open_missing_image_fails() {
        let config = CameraConfig {
            image_path: Some("/nonexistent/still.png".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.open(), Err(CameraError::Open(_))));
    }
}
