use async_trait::async_trait;
use thiserror::Error;

use crate::models::PricePoint;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("ticker not found")]
    NotFound,
}

/// Source of daily closing prices.
///
/// Implementations return points sorted ascending by date, one per trading day,
/// already reduced to timezone-naive calendar dates. An unknown or delisted
/// ticker may come back as `NotFound` or as an empty series.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError>;
}
