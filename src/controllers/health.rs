use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::speech::SpeechService;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready once provider credentials are configured
pub async fn health_ready(State(speech_service): State<Arc<SpeechService>>) -> impl IntoResponse {
    if speech_service.is_configured() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "tts": "configured"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "tts": "missing_credentials"
            })),
        )
    }
}
