pub mod memory;
pub mod middleware;

use async_trait::async_trait;
use std::time::Duration;

pub use memory::InMemoryRateLimiter;
pub use middleware::{client_key, rate_limit_middleware, RateLimitState};

/// Admission policy: at most `points` admissions per key in any window of `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub points: u32,
    pub duration: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            points: 60,
            duration: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rate limit exceeded, next admission in {retry_after:?}")]
pub struct RateLimitExceeded {
    pub retry_after: Duration,
}

/// Per-key admission control.
///
/// Constructed once at startup and shared by handlers; an implementation backed by a
/// shared store can replace the in-memory one without touching the HTTP layer.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record an admission for `key`, or refuse it when the key's budget is spent.
    async fn consume(&self, key: &str) -> Result<(), RateLimitExceeded>;
}
