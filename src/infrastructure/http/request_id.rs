use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Longest inbound id we are willing to echo back
const MAX_INBOUND_ID_LEN: usize = 128;

/// Middleware to attach a request ID to each request and response.
/// An id supplied by an upstream proxy is kept; otherwise a new one is generated.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_INBOUND_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, header_value);
    }

    response
}

/// Request ID wrapper type for extension
#[derive(Debug, Clone)]
pub struct RequestId(pub String);
