pub mod price_provider;
pub mod yahoofinance;
pub mod twelvedata;
pub mod alphavantage;
pub mod multi_provider;
pub mod mock_provider;
pub mod guarded_provider;

use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, ConfigError, ProviderKind};
use crate::errors::AppError;
use crate::services::failure_cache::FailureCache;
use crate::services::rate_limiter::RateLimiter;
use alphavantage::AlphaVantageProvider;
use guarded_provider::GuardedProvider;
use mock_provider::MockProvider;
use multi_provider::MultiProvider;
use price_provider::PriceProvider;
use twelvedata::TwelveDataProvider;
use yahoofinance::YahooFinanceProvider;

/// Builds the configured provider, wrapped with rate limiting and the failure cache.
pub fn build_provider(config: &AppConfig) -> Result<Arc<dyn PriceProvider>, AppError> {
    let inner: Box<dyn PriceProvider> = match config.provider {
        ProviderKind::Yahoo => {
            info!("📊 Using price provider: Yahoo Finance");
            Box::new(YahooFinanceProvider::new())
        }
        ProviderKind::TwelveData => {
            info!("📊 Using price provider: Twelve Data");
            Box::new(TwelveDataProvider::new(require_key(config, config.twelvedata_api_key.as_deref(), "TWELVEDATA_API_KEY")?))
        }
        ProviderKind::AlphaVantage => {
            info!("📊 Using price provider: Alpha Vantage");
            Box::new(AlphaVantageProvider::new(require_key(config, config.alphavantage_api_key.as_deref(), "ALPHAVANTAGE_API_KEY")?))
        }
        ProviderKind::Multi => {
            info!("📊 Using price provider: Multi-provider (Twelve Data, Alpha Vantage, Yahoo Finance)");
            let twelvedata = require_key(config, config.twelvedata_api_key.as_deref(), "TWELVEDATA_API_KEY")?;
            let alphavantage = require_key(config, config.alphavantage_api_key.as_deref(), "ALPHAVANTAGE_API_KEY")?;
            let mut chain: Vec<(&'static str, Box<dyn PriceProvider>)> = Vec::with_capacity(3);
            chain.push(("twelvedata", Box::new(TwelveDataProvider::new(twelvedata))));
            chain.push(("alphavantage", Box::new(AlphaVantageProvider::new(alphavantage))));
            chain.push(("yahoo", Box::new(YahooFinanceProvider::new())));
            Box::new(MultiProvider::new(chain))
        }
        ProviderKind::Mock => {
            info!("📊 Using price provider: synthetic mock prices");
            return Ok(Arc::new(MockProvider::new()));
        }
    };

    Ok(Arc::new(GuardedProvider::new(
        inner,
        RateLimiter::new(config.max_concurrent_requests, config.requests_per_minute),
        FailureCache::new(),
    )))
}

fn require_key(config: &AppConfig, key: Option<&str>, name: &'static str) -> Result<String, AppError> {
    key.map(str::to_string).ok_or_else(|| {
        AppError::Config(ConfigError::MissingKey {
            key: name,
            provider: format!("{:?}", config.provider).to_lowercase(),
        })
    })
}
