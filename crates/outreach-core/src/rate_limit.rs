//! Fixed-interval gate for outbound calls.
//!
//! One [`RateLimiter`] exists per external dependency (scraping, generation)
//! and is handed to the component that talks to it. Clones share the same
//! clock, so every caller holding a clone is throttled together.
//!
//! ```rust
//! use std::time::Duration;
//! use outreach_core::rate_limit::RateLimiter;
//!
//! # async fn run() {
//! let limiter = RateLimiter::new(Duration::from_millis(500));
//! limiter.acquire().await; // immediate
//! limiter.acquire().await; // ~500ms later
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Admits one unit of work per `interval`.
///
/// The first grant is immediate. Waiters queue on a fair mutex, so grants
/// are handed out in arrival order.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval: Duration,
    last_grant: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_grant: Arc::new(Mutex::new(None)),
        }
    }

    /// Builds a limiter from a millisecond setting. Zero or negative disables throttling.
    pub fn from_millis(ms: i64) -> Self {
        match u64::try_from(ms) {
            Ok(ms) => Self::new(Duration::from_millis(ms)),
            Err(_) => Self::unlimited(),
        }
    }

    /// A limiter that admits every request immediately.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until at least `interval` has passed since the previous grant.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }

        let mut last = self.last_grant.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.interval;
            let now = Instant::now();
            if ready_at > now {
                tracing::debug!(
                    wait_ms = %(ready_at - now).as_millis(),
                    "Rate limiting"
                );
                // Keep the lock while sleeping so later callers queue behind us.
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}
