//! Sound Toggle Routes

use alerting::SoundStatus;
use axum::{extract::State, Json};

use crate::SharedState;

/// Current sound switch position
pub async fn get_sound(State(state): State<SharedState>) -> Json<SoundStatus> {
    let state = state.read().await;
    Json(state.sound.status())
}

/// Flip the sound switch
pub async fn toggle_sound(State(state): State<SharedState>) -> Json<SoundStatus> {
    let state = state.read().await;
    let enabled = state.sound.toggle();
    Json(SoundStatus::from_enabled(enabled))
}

#[cfg(test)]
mod tests {
    use crate::create_router;
    use crate::tests::test_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_toggle_flips_shared_switch() {
        let (state, sound, _) = test_state(false);
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/sound/toggle")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["enabled"], true);
        assert_eq!(json["button_label"], "Disable Sound");
        assert_eq!(json["status_label"], "Sound: Enabled");
        assert!(sound.is_enabled());

        let response = app
            .oneshot(Request::get("/api/v1/sound").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["enabled"], true);
    }

    #[tokio::test]
    async fn test_toggle_requires_post() {
        let (state, _, _) = test_state(false);
        let response = create_router(state)
            .oneshot(
                Request::get("/api/v1/sound/toggle")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
