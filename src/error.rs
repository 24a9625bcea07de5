use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Too many requests";
pub const SERVER_MISCONFIGURED_MESSAGE: &str = "Server TTS sozlanmagan (API_KEY/VOICE_ID yo‘q).";
pub const TEXT_REQUIRED_MESSAGE: &str = "Matn (text) talab qilinadi.";
pub const UPSTREAM_ERROR_MESSAGE: &str = "ElevenLabs error";
pub const INTERNAL_ERROR_MESSAGE: &str = "Server ichki xatosi";

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Rate limit exceeded")]
    RateLimitExceeded { key: String, retry_after: Duration },

    #[error("Speech provider credentials are not configured")]
    ServerMisconfigured,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Speech provider returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// JSON error body: `{"error": ..., "detail": ...}`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::ServerMisconfigured | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing body. Internal causes stay in the logs.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            Self::RateLimitExceeded { .. } => ErrorResponse {
                error: TOO_MANY_REQUESTS_MESSAGE.to_string(),
                detail: None,
            },
            Self::ServerMisconfigured => ErrorResponse {
                error: SERVER_MISCONFIGURED_MESSAGE.to_string(),
                detail: None,
            },
            Self::InvalidInput(_) => ErrorResponse {
                error: TEXT_REQUIRED_MESSAGE.to_string(),
                detail: None,
            },
            Self::Upstream { detail, .. } => ErrorResponse {
                error: UPSTREAM_ERROR_MESSAGE.to_string(),
                detail: Some(detail.clone()),
            },
            Self::Internal(_) => ErrorResponse {
                error: INTERNAL_ERROR_MESSAGE.to_string(),
                detail: None,
            },
        }
    }

    /// Seconds a rejected client should wait, rounded up
    fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimitExceeded { retry_after, .. } => {
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                Some(secs.max(1))
            }
            _ => None,
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let Self::RateLimitExceeded { key, retry_after } = &self {
            // Fires once per rejected request
            tracing::debug!(
                key = %key,
                retry_after_ms = retry_after.as_millis(),
                "Request rate limited"
            );
        } else if status.is_server_error() {
            tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                status = %status.as_u16(),
                "Request rejected"
            );
        }

        let retry_after = self.retry_after_secs();
        let mut response = (status, Json(self.to_response())).into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
