use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use super::RateLimiter;
use crate::error::AppError;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";

/// State for the rate limit middleware
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<dyn RateLimiter>,
    /// Use the first `X-Forwarded-For` hop as the client address
    pub trust_proxy: bool,
}

/// Rate limit middleware. Rejected requests never reach the handler.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request, state.trust_proxy);

    if let Err(exceeded) = state.limiter.consume(&key).await {
        return Err(AppError::RateLimitExceeded {
            key,
            retry_after: exceeded.retry_after,
        });
    }

    Ok(next.run(request).await)
}

/// Client identifier used as the rate limit key
pub fn client_key(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = forwarded_ip(request.headers()) {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_canonical().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse::<IpAddr>()
        .ok()
        .map(|ip| ip.to_canonical())
}
