use async_trait::async_trait;
use tracing::{info, warn};

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::PricePoint;

/// Tries each provider in order until one returns a non-empty history.
///
/// A rate-limited or failing provider falls through to the next one. When every
/// provider fails, the last error is returned; when they all answer with an
/// empty series, the result is an empty series.
pub struct MultiProvider {
    providers: Vec<(&'static str, Box<dyn PriceProvider>)>,
}

impl MultiProvider {
    pub fn new(providers: Vec<(&'static str, Box<dyn PriceProvider>)>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl PriceProvider for MultiProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        let mut last_error = None;

        for (name, provider) in &self.providers {
            match provider.fetch_daily_history(ticker, days).await {
                Ok(points) if !points.is_empty() => {
                    info!("✓ Fetched {} ({} points) from {}", ticker, points.len(), name);
                    return Ok(points);
                }
                Ok(_) => {
                    info!("No data for {} from {}, trying next provider", ticker, name);
                }
                Err(PriceProviderError::RateLimited) => {
                    info!("⚠️ {} rate limited for {}, trying next provider", name, ticker);
                    last_error = Some(PriceProviderError::RateLimited);
                }
                Err(e) => {
                    warn!("{} failed for {}: {}", name, ticker, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(Vec::new()),
        }
    }
}
