//! What the dashboard shows

use std::fmt;

use alerting::AlertDecision;
use camera_capture::CameraConfig;
use overlay::{OverlayScene, Palette};
use serde::{Serialize, Serializer};

/// Startup and run status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    WaitingForDetector,
    LoadingModels,
    StartingVideo,
    Ready,
    Stopped,
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::WaitingForDetector => f.write_str("Waiting for detector..."),
            Status::LoadingModels => f.write_str("Loading models..."),
            Status::StartingVideo => f.write_str("Models loaded. Starting video..."),
            Status::Ready => f.write_str("Ready! Analyzing emotions..."),
            Status::Stopped => f.write_str("Stopped"),
            Status::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Latest display state, published after every tick
#[derive(Debug, Clone, Serialize)]
pub struct DisplaySnapshot {
    pub status: Status,

    /// A face was found on the latest tick
    pub face_present: bool,

    /// Last shown anger level (kept while no face is visible)
    pub anger_percentage: u8,

    /// Last shown dominant emotion, capitalized
    pub dominant_emotion: String,

    pub is_angry: bool,

    pub palette: Palette,

    pub overlay: OverlayScene,

    /// Chimes attempted since startup
    pub alert_count: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_alert: Option<AlertDecision>,

    /// Ticks processed
    pub ticks: u64,

    /// Wall clock of the last update (Unix milliseconds)
    pub updated_at_ms: u64,
}

impl DisplaySnapshot {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            status: Status::WaitingForDetector,
            face_present: false,
            anger_percentage: 0,
            dominant_emotion: String::new(),
            is_angry: false,
            palette: Palette::CALM,
            overlay: OverlayScene::empty(frame_width, frame_height),
            alert_count: 0,
            last_alert: None,
            ticks: 0,
            updated_at_ms: now_ms(),
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at_ms = now_ms();
    }
}

impl Default for DisplaySnapshot {
    fn default() -> Self {
        let camera = CameraConfig::default();
        Self::new(camera.width, camera.height)
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
