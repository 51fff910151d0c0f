//! Display State Routes

use alerting::SoundStatus;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use session::DisplaySnapshot;
use tracing::error;

use crate::SharedState;

/// Display snapshot plus the sound control
#[derive(Debug, Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub display: DisplaySnapshot,
    pub sound: SoundStatus,
}

/// Get the current display state
pub async fn get_state(State(state): State<SharedState>) -> Json<StateResponse> {
    let state = state.read().await;
    let display = state.display.borrow().clone();

    Json(StateResponse {
        display,
        sound: state.sound.status(),
    })
}

/// Render the current overlay box as PNG
pub async fn get_overlay_png(State(state): State<SharedState>) -> Response {
    let scene = {
        let state = state.read().await;
        let scene = state.display.borrow().overlay.clone();
        scene
    };

    match overlay::render_png(&scene) {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(e) => {
            error!("Overlay render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
