//! Alerting System
//!
//! Debounces the anger alert chime: a mute switch, a cooldown state machine,
//! and the audio sinks that actually make noise.

mod debouncer;
mod sink;
mod switch;

pub use debouncer::{AlertConfig, AlertDebouncer, AlertDecision, AlertPhase};
#[cfg(feature = "audio")]
pub use sink::ToneChime;
pub use sink::{AlertSink, RecordingSink, TerminalBell};
pub use switch::{SoundStatus, SoundSwitch};

use thiserror::Error;

/// Alert playback errors
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("No audio output device available")]
    NoDevice,

    #[error("Audio output error: {0}")]
    Output(String),

    #[error("Playback failed: {0}")]
    Playback(String),
}
