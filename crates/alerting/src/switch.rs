//! User-facing sound on/off switch

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

/// Shared sound-enabled flag.
///
/// Cloned into whatever drives the toggle (the dashboard) and the debouncer.
#[derive(Debug, Clone, Default)]
pub struct SoundSwitch {
    enabled: Arc<AtomicBool>,
}

impl SoundSwitch {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        info!("Sound {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Flip the switch, returning the new state
    pub fn toggle(&self) -> bool {
        let enabled = !self.enabled.fetch_xor(true, Ordering::AcqRel);
        info!("Sound {}", if enabled { "enabled" } else { "disabled" });
        enabled
    }

    pub fn status(&self) -> SoundStatus {
        SoundStatus::from_enabled(self.is_enabled())
    }
}

/// What the toggle control shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundStatus {
    pub enabled: bool,
    pub button_label: &'static str,
    pub status_label: &'static str,
}

impl SoundStatus {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self {
                enabled,
                button_label: "Disable Sound",
                status_label: "Sound: Enabled",
            }
        } else {
            Self {
                enabled,
                button_label: "Enable Sound",
                status_label: "Sound: Disabled",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disabled_by_default() {
        let switch = SoundSwitch::default();
        assert!(!switch.is_enabled());
        assert_eq!(switch.status().button_label, "Enable Sound");
    }

    #[test]
    fn test_toggle_is_shared_between_clones() {
        let switch = SoundSwitch::new(false);
        let handle = switch.clone();

        assert!(handle.toggle());
        assert!(switch.is_enabled());
        assert_eq!(switch.status().status_label, "Sound: Enabled");

        assert!(!switch.toggle());
        assert!(!handle.is_enabled());
    }
}
