use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep, Duration, Instant};

/// Caps concurrent provider calls and spaces them out to stay inside
/// free-tier quotas (Twelve Data 8 req/min, Alpha Vantage 5 req/min).
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    // Start time of the most recent request.
    last_request: Mutex<Option<Instant>>,
    min_delay: Duration,
}

impl RateLimiter {
    /// `requests_per_minute == 0` disables spacing; only the concurrency cap applies.
    pub fn new(max_concurrent: usize, requests_per_minute: u32) -> Self {
        let min_delay = match requests_per_minute {
            0 => Duration::ZERO,
            rpm => Duration::from_millis(60_000 / u64::from(rpm)),
        };
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            last_request: Mutex::new(None),
            min_delay,
        }
    }

    /// Waits for a permit and for the spacing window, then returns a guard
    /// that releases the permit when dropped.
    pub async fn acquire(&self) -> RateLimitGuard {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("rate limiter semaphore is never closed");

        // Reserve the next slot under the lock, sleep outside it.
        let wait = {
            let mut last = self.last_request.lock();
            let now = Instant::now();
            let slot = match *last {
                Some(prev) if prev + self.min_delay > now => prev + self.min_delay,
                _ => now,
            };
            *last = Some(slot);
            slot.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            sleep(wait).await;
        }

        RateLimitGuard { _permit: permit }
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

pub struct RateLimitGuard {
    _permit: OwnedSemaphorePermit,
}
