//! Layered configuration: defaults, then an optional TOML file, then
//! `ANGER_WATCH__SECTION__KEY` environment variables.

use alerting::AlertConfig;
use camera_capture::CameraConfig;
use config::{Config, Environment, File, FileFormat};
use expression::ExpressionConfig;
use serde::{Deserialize, Serialize};
use session::SessionConfig;
use tracing::debug;

use crate::ApiError;

/// Environment variable naming the config file
pub const CONFIG_PATH_VAR: &str = "ANGER_WATCH_CONFIG";
/// Config file used when the variable is unset
pub const DEFAULT_CONFIG_PATH: &str = "anger-watch.toml";

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    /// JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub session: SessionConfig,
    pub expression: ExpressionConfig,
    pub alerting: AlertConfig,
    pub camera: CameraConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load from the file named by `ANGER_WATCH_CONFIG` (optional) and the environment
    pub fn load() -> Result<Self, ApiError> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        debug!("Reading configuration from {}", path);

        let settings = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Load from TOML text (no environment)
    pub fn from_toml(toml: &str) -> Result<Self, ApiError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("ANGER_WATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.session.poll_interval_ms, 100);
        assert_eq!(settings.alerting.cooldown_ms, 3000);
        assert_eq!(settings.expression.anger_threshold, 0.5);
        assert_eq!(settings.expression.input_size, 224);
        assert_eq!(settings.camera.width, 720);
        assert!(!settings.alerting.sound_enabled);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let settings = Settings::from_toml(
            r#"
            [alerting]
            sound_enabled = true
            cooldown_ms = 5000

            [expression]
            replay_path = "demos/angry-then-calm.jsonl"

            [server]
            bind = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        assert!(settings.alerting.sound_enabled);
        assert_eq!(settings.alerting.cooldown_ms, 5000);
        assert_eq!(settings.alerting.tone_ms, 400);
        assert_eq!(
            settings.expression.replay_path.as_deref(),
            Some("demos/angry-then-calm.jsonl")
        );
        assert_eq!(settings.expression.min_confidence, 0.5);
        assert_eq!(settings.server.bind, "0.0.0.0:9000");
    }

    // The only test here that reads the process environment
    #[test]
    fn test_load_layers_file_then_environment() {
        let dir = std::env::temp_dir().join(format!("anger-watch-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("anger-watch.toml");
        std::fs::write(
            &path,
            "[session]\npoll_interval_ms = 200\n\n[expression]\nreplay_path = \"demos/x.jsonl\"\n",
        )
        .unwrap();

        std::env::set_var(CONFIG_PATH_VAR, &path);
        std::env::set_var("ANGER_WATCH__SESSION__POLL_INTERVAL_MS", "250");
        std::env::set_var("ANGER_WATCH__ALERTING__SOUND_ENABLED", "true");
        let loaded = Settings::load();
        std::env::remove_var(CONFIG_PATH_VAR);
        std::env::remove_var("ANGER_WATCH__SESSION__POLL_INTERVAL_MS");
        std::env::remove_var("ANGER_WATCH__ALERTING__SOUND_ENABLED");
        std::fs::remove_dir_all(&dir).ok();

        let settings = loaded.unwrap();
        // File value kept, file value overridden by env, default overridden by env
        assert_eq!(settings.expression.replay_path.as_deref(), Some("demos/x.jsonl"));
        assert_eq!(settings.session.poll_interval_ms, 250);
        assert!(settings.alerting.sound_enabled);
        assert_eq!(settings.alerting.cooldown_ms, 3000);
    }

    #[test]
    fn test_bad_types_are_rejected() {
        assert!(Settings::from_toml("[session]\npoll_interval_ms = \"soon\"").is_err());
    }
}
