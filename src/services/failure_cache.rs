use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::external::price_provider::PriceProviderError;

/// A failed history fetch for a ticker, remembered until its TTL runs out.
#[derive(Debug, Clone)]
pub struct FailureInfo {
    pub failed_at: DateTime<Utc>,
    pub failure_type: FailureType,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    NotFound,
    RateLimited,
    ApiError,
}

impl FailureType {
    pub fn ttl(self) -> Duration {
        match self {
            FailureType::NotFound => Duration::hours(24),
            FailureType::RateLimited => Duration::hours(1),
            FailureType::ApiError => Duration::hours(6),
        }
    }
}

impl From<&PriceProviderError> for FailureType {
    fn from(error: &PriceProviderError) -> Self {
        match error {
            PriceProviderError::NotFound => FailureType::NotFound,
            PriceProviderError::RateLimited => FailureType::RateLimited,
            _ => FailureType::ApiError,
        }
    }
}

impl FailureInfo {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.failed_at + self.failure_type.ttl()
    }

    /// The error a cached failure is replayed as.
    pub fn to_error(&self) -> PriceProviderError {
        match self.failure_type {
            FailureType::NotFound => PriceProviderError::NotFound,
            FailureType::RateLimited => PriceProviderError::RateLimited,
            FailureType::ApiError => {
                PriceProviderError::BadResponse(format!("cached failure: {}", self.message))
            }
        }
    }
}

/// Thread-safe record of tickers whose last fetch failed, so known-bad
/// tickers do not cost an API call on every computation.
#[derive(Clone, Default)]
pub struct FailureCache {
    cache: Arc<DashMap<String, FailureInfo>>,
}

impl FailureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_failed(&self, ticker: &str) -> Option<FailureInfo> {
        self.is_failed_at(ticker, Utc::now())
    }

    fn is_failed_at(&self, ticker: &str, now: DateTime<Utc>) -> Option<FailureInfo> {
        let info = self.cache.get(ticker).map(|entry| entry.value().clone())?;
        if now < info.expires_at() {
            return Some(info);
        }
        self.cache.remove(ticker);
        None
    }

    pub fn record_failure(&self, ticker: &str, error: &PriceProviderError) {
        self.record_failure_at(ticker, error, Utc::now());
    }

    fn record_failure_at(&self, ticker: &str, error: &PriceProviderError, failed_at: DateTime<Utc>) {
        let info = FailureInfo {
            failed_at,
            failure_type: FailureType::from(error),
            message: error.to_string(),
        };
        self.cache.insert(ticker.to_string(), info);
    }

    pub fn clear(&self, ticker: &str) {
        self.cache.remove(ticker);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
