//! Detector and frame source startup

use alerting::AlertSink;
use camera_capture::FrameSource;
use expression::ReplayDetector;
use session::{EmotionSession, Status};
use tracing::error;

use crate::{ApiError, Settings};

/// What the sampling loop runs on
pub struct Inputs {
    pub detector: ReplayDetector,
    pub source: Box<dyn FrameSource + Send>,
}

/// Open the detector and the frame source, stepping the status line along.
///
/// Any failure is fatal: the session shows `Error: ...` and the error is
/// returned for the caller to exit with.
pub fn open_inputs<S: AlertSink>(
    session: &mut EmotionSession<S>,
    settings: &Settings,
) -> Result<Inputs, ApiError> {
    try_open(session, settings).map_err(|e| {
        error!("Startup failed: {}", e);
        session.set_status(Status::Error(e.to_string()));
        e
    })
}

fn try_open<S: AlertSink>(
    session: &mut EmotionSession<S>,
    settings: &Settings,
) -> Result<Inputs, ApiError> {
    session.set_status(Status::WaitingForDetector);
    let replay_path = settings
        .expression
        .replay_path
        .as_deref()
        .ok_or(ApiError::NoDetector)?;

    session.set_status(Status::LoadingModels);
    let detector = ReplayDetector::open(replay_path)?;

    session.set_status(Status::StartingVideo);
    let source = settings.camera.open()?;

    Ok(Inputs { detector, source })
}
