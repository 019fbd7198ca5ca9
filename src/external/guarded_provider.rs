use async_trait::async_trait;
use tracing::{debug, warn};

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::PricePoint;
use crate::services::failure_cache::FailureCache;
use crate::services::rate_limiter::RateLimiter;

/// Wraps a provider with request spacing and a failure cache.
///
/// A ticker with a live cached failure is answered from the cache without a
/// network call. Successful fetches clear the ticker's entry.
pub struct GuardedProvider {
    inner: Box<dyn PriceProvider>,
    limiter: RateLimiter,
    failures: FailureCache,
}

impl GuardedProvider {
    pub fn new(inner: Box<dyn PriceProvider>, limiter: RateLimiter, failures: FailureCache) -> Self {
        Self { inner, limiter, failures }
    }

    pub fn failure_cache(&self) -> &FailureCache {
        &self.failures
    }
}

#[async_trait]
impl PriceProvider for GuardedProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        if let Some(failure) = self.failures.is_failed(ticker) {
            debug!(
                "Skipping fetch for {} - cached {:?} failure until {}",
                ticker,
                failure.failure_type,
                failure.expires_at()
            );
            return Err(failure.to_error());
        }

        let _guard = self.limiter.acquire().await;

        match self.inner.fetch_daily_history(ticker, days).await {
            Ok(points) => {
                self.failures.clear(ticker);
                Ok(points)
            }
            Err(e) => {
                warn!("✗ Failed to fetch price history for {}: {}", ticker, e);
                self.failures.record_failure(ticker, &e);
                Err(e)
            }
        }
    }
}
