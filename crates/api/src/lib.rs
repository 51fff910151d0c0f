//! Anger Watch Dashboard API
//!
//! HTTP surface for the sampling loop: live display state, the sound toggle,
//! the overlay image, health, and Prometheus metrics.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use session::{DisplaySnapshot, Status};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use alerting::SoundSwitch;

mod routes;
pub mod settings;
pub mod startup;

pub use settings::{LoggingConfig, ServerConfig, Settings};
pub use startup::{open_inputs, Inputs};

/// API and startup errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Metrics setup failed: {0}")]
    Metrics(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no detector configured (set expression.replay_path)")]
    NoDetector,

    #[error(transparent)]
    Detector(#[from] expression::ExpressionError),

    #[error(transparent)]
    Camera(#[from] camera_capture::CameraError),
}

/// Application state shared across handlers
pub struct AppState {
    /// Sound on/off, shared with the alert debouncer
    pub sound: SoundSwitch,
    /// Latest snapshot from the sampling loop
    pub display: watch::Receiver<DisplaySnapshot>,
    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(
        sound: SoundSwitch,
        display: watch::Receiver<DisplaySnapshot>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            sound,
            display,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Shared handle passed to every handler
pub type SharedState = Arc<RwLock<AppState>>;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub sampler: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub ticks: u64,
    pub last_activity_ms: Option<u64>,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/state", get(routes::state::get_state))
        .route("/api/v1/overlay.png", get(routes::state::get_overlay_png))
        .route("/api/v1/sound", get(routes::sound::get_sound))
        .route("/api/v1/sound/toggle", post(routes::sound::toggle_sound))
        .route("/metrics", get(routes::metrics::get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    let snapshot = state.display.borrow().clone();
    let timestamp_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let status = match snapshot.status {
        Status::Error(_) => "unhealthy",
        Status::Ready => "healthy",
        Status::Stopped => "stopped",
        _ => "starting",
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: timestamp_ms / 1000,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        sampler: ComponentHealth {
            status: snapshot.status.to_string(),
            ticks: snapshot.ticks,
            last_activity_ms: (snapshot.ticks > 0)
                .then(|| timestamp_ms.saturating_sub(snapshot.updated_at_ms)),
        },
    })
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| ApiError::Logging(e.to_string()))
}

/// Install the Prometheus recorder behind the `metrics` macros
pub fn install_metrics() -> Result<PrometheusHandle, ApiError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::Metrics(e.to_string()))
}

/// Serve the dashboard API until `shutdown` turns true
pub async fn run_server(
    listener: tokio::net::TcpListener,
    state: SharedState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), ApiError> {
    let app = create_router(state);
    info!("Starting API server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    pub(crate) fn test_state(
        enabled: bool,
    ) -> (SharedState, SoundSwitch, watch::Sender<DisplaySnapshot>) {
        let sound = SoundSwitch::new(enabled);
        let (tx, rx) = watch::channel(DisplaySnapshot::default());
        let state = Arc::new(RwLock::new(AppState::new(sound.clone(), rx, None)));
        (state, sound, tx)
    }

    #[tokio::test]
    async fn test_health_reports_sampler_status() {
        let (state, _, tx) = test_state(false);
        tx.send_modify(|s| s.status = Status::Ready);

        let response = create_router(state)
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["sampler"]["status"], "Ready! Analyzing emotions...");
    }

    #[tokio::test]
    async fn test_health_after_loop_exit_is_stopped() {
        let (state, _, tx) = test_state(false);
        tx.send_modify(|s| {
            s.status = Status::Stopped;
            s.ticks = 12;
        });

        let response = create_router(state)
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "stopped");
        assert_eq!(json["sampler"]["status"], "Stopped");
        assert_eq!(json["sampler"]["ticks"], 12);
    }

    #[tokio::test]
    async fn test_metrics_without_recorder_is_not_found() {
        let (state, _, _) = test_state(false);
        let response = create_router(state)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
