use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_BENCHMARK_SYMBOL: &str = "^GSPC";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} is required when PRICE_PROVIDER={provider}")]
    MissingKey { key: &'static str, provider: String },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Which price source backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Yahoo,
    TwelveData,
    AlphaVantage,
    /// Twelve Data, then Alpha Vantage, then Yahoo Finance.
    Multi,
    /// Synthetic prices, no network.
    Mock,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Ok(ProviderKind::Yahoo),
            "twelvedata" => Ok(ProviderKind::TwelveData),
            "alphavantage" => Ok(ProviderKind::AlphaVantage),
            "multi" => Ok(ProviderKind::Multi),
            "mock" => Ok(ProviderKind::Mock),
            _ => Err(ConfigError::InvalidValue {
                key: "PRICE_PROVIDER",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderKind,
    pub twelvedata_api_key: Option<String>,
    pub alphavantage_api_key: Option<String>,
    pub benchmark_symbol: String,
    pub max_concurrent_requests: usize,
    pub requests_per_minute: u32,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("PRICE_PROVIDER") {
            Some(value) => value.parse()?,
            None => ProviderKind::Yahoo,
        };

        let config = Self {
            provider,
            twelvedata_api_key: lookup("TWELVEDATA_API_KEY").filter(|k| !k.trim().is_empty()),
            alphavantage_api_key: lookup("ALPHAVANTAGE_API_KEY").filter(|k| !k.trim().is_empty()),
            benchmark_symbol: lookup("BENCHMARK_SYMBOL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BENCHMARK_SYMBOL.to_string()),
            max_concurrent_requests: parse_or(&lookup, "PROVIDER_MAX_CONCURRENT", 3)?,
            requests_per_minute: parse_or(&lookup, "PROVIDER_REQUESTS_PER_MINUTE", 8)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let needs_twelvedata = matches!(self.provider, ProviderKind::TwelveData | ProviderKind::Multi);
        let needs_alphavantage = matches!(self.provider, ProviderKind::AlphaVantage | ProviderKind::Multi);

        if needs_twelvedata && self.twelvedata_api_key.is_none() {
            return Err(self.missing("TWELVEDATA_API_KEY"));
        }
        if needs_alphavantage && self.alphavantage_api_key.is_none() {
            return Err(self.missing("ALPHAVANTAGE_API_KEY"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidValue {
                key: "PROVIDER_MAX_CONCURRENT",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    fn missing(&self, key: &'static str) -> ConfigError {
        ConfigError::MissingKey {
            key,
            provider: format!("{:?}", self.provider).to_lowercase(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}
