//! Prometheus exposition

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::SharedState;

/// Render collected metrics
pub async fn get_metrics(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}
