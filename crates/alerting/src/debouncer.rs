//! Alert debouncer implementation

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{AlertSink, SoundSwitch};

/// Alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Quiet period after a chime (milliseconds, default: 3000)
    pub cooldown_ms: u64,
    /// Sound switch position at startup
    pub sound_enabled: bool,
    /// Play through the audio device instead of the terminal bell
    pub use_audio_device: bool,
    /// Chime pitch (Hz)
    pub tone_hz: f32,
    /// Chime length (milliseconds)
    pub tone_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 3000,
            sound_enabled: false,
            use_audio_device: false,
            tone_hz: 880.0,
            tone_ms: 400,
        }
    }
}

impl AlertConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Debouncer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPhase {
    /// Ready to play
    Idle,
    /// Request accepted, chime starting
    Armed,
    /// Further requests dropped until `until`
    Cooldown { until: Instant },
}

/// What happened to an alert request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertDecision {
    Played,
    /// Accepted but the sink failed; cooldown still starts
    PlaybackFailed,
    SuppressedMuted,
    SuppressedCooldown,
}

impl AlertDecision {
    pub fn accepted(&self) -> bool {
        matches!(self, AlertDecision::Played | AlertDecision::PlaybackFailed)
    }
}

/// Plays the alert at most once per cooldown window, and only while the
/// sound switch is on.
pub struct AlertDebouncer<S> {
    config: AlertConfig,
    sink: S,
    switch: SoundSwitch,
    phase: AlertPhase,
    fire_count: u64,
}

impl<S: AlertSink> AlertDebouncer<S> {
    /// Create a new debouncer
    pub fn new(config: AlertConfig, sink: S, switch: SoundSwitch) -> Self {
        info!("Creating alert debouncer with config: {:?}", config);
        Self {
            config,
            sink,
            switch,
            phase: AlertPhase::Idle,
            fire_count: 0,
        }
    }

    /// Ask for the chime at `now`
    pub fn request(&mut self, now: Instant) -> AlertDecision {
        self.poll(now);

        if !self.switch.is_enabled() {
            debug!("Alert suppressed: sound disabled");
            return AlertDecision::SuppressedMuted;
        }

        if let AlertPhase::Cooldown { until } = self.phase {
            debug!(
                "Alert suppressed: in cooldown for another {:?}",
                until.saturating_duration_since(now)
            );
            return AlertDecision::SuppressedCooldown;
        }

        self.phase = AlertPhase::Armed;
        let played = self.sink.play();
        self.phase = AlertPhase::Cooldown {
            until: now + self.config.cooldown(),
        };
        self.fire_count += 1;

        match played {
            Ok(()) => {
                info!("Anger alert played (count: {})", self.fire_count);
                AlertDecision::Played
            }
            Err(e) => {
                error!("Error playing sound: {}", e);
                AlertDecision::PlaybackFailed
            }
        }
    }

    /// Let an elapsed cooldown return to idle
    pub fn poll(&mut self, now: Instant) -> AlertPhase {
        if let AlertPhase::Cooldown { until } = self.phase {
            if now >= until {
                debug!("Alert cooldown elapsed");
                self.phase = AlertPhase::Idle;
            }
        }
        self.phase
    }

    pub fn phase(&self) -> AlertPhase {
        self.phase
    }

    /// Chimes attempted so far
    pub fn fire_count(&self) -> u64 {
        self.fire_count
    }

    pub fn switch(&self) -> &SoundSwitch {
        &self.switch
    }
}
