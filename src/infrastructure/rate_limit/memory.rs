use super::{RateLimitExceeded, RateLimitPolicy, RateLimiter};
use async_trait::async_trait;
use moka::future::Cache;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Admission timestamps still inside the window, oldest first
#[derive(Debug, Default)]
struct SlidingWindow {
    admissions: VecDeque<Instant>,
}

impl SlidingWindow {
    /// Admit at `now` or return how long until the oldest admission leaves the window.
    fn try_admit(&mut self, now: Instant, policy: &RateLimitPolicy) -> Result<(), Duration> {
        while let Some(&oldest) = self.admissions.front() {
            if now.saturating_duration_since(oldest) >= policy.duration {
                self.admissions.pop_front();
            } else {
                break;
            }
        }

        if self.admissions.len() >= policy.points as usize {
            let oldest = self.admissions.front().copied().unwrap_or(now);
            return Err((oldest + policy.duration).saturating_duration_since(now));
        }

        self.admissions.push_back(now);
        Ok(())
    }
}

/// Process-local sliding-log limiter.
///
/// Keys that stay idle for a whole window are evicted; by then every admission they
/// held has expired, so eviction never loosens the bound. The table itself is unbounded
/// in the cache; `max_keys` is enforced here by refusing unseen keys while it is full.
pub struct InMemoryRateLimiter {
    policy: RateLimitPolicy,
    max_keys: u64,
    windows: Cache<String, Arc<Mutex<SlidingWindow>>>,
}

impl InMemoryRateLimiter {
    pub fn new(policy: RateLimitPolicy, max_keys: u64) -> Self {
        let windows = Cache::builder().time_to_idle(policy.duration).build();

        tracing::info!(
            points = policy.points,
            duration_secs = policy.duration.as_secs_f64(),
            max_keys = max_keys,
            "In-memory rate limiter initialized"
        );

        Self {
            policy,
            max_keys,
            windows,
        }
    }

    /// Whether a key we have no window for may get one
    async fn has_room_for_new_key(&self) -> bool {
        if self.windows.entry_count() < self.max_keys {
            return true;
        }

        // entry_count lags behind inserts and expirations until housekeeping runs
        self.windows.run_pending_tasks().await;
        self.windows.entry_count() < self.max_keys
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn consume(&self, key: &str) -> Result<(), RateLimitExceeded> {
        if !self.windows.contains_key(key) && !self.has_room_for_new_key().await {
            tracing::debug!(
                key = key,
                max_keys = self.max_keys,
                "Rate limiter key table is full, refusing new client"
            );
            return Err(RateLimitExceeded {
                retry_after: self.policy.duration,
            });
        }

        let window = self
            .windows
            .get_with(key.to_string(), async {
                Arc::new(Mutex::new(SlidingWindow::default()))
            })
            .await;

        let admitted = window.lock().try_admit(Instant::now(), &self.policy);

        admitted.map_err(|retry_after| RateLimitExceeded { retry_after })
    }
}
