use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::PricePoint;

pub struct TwelveDataProvider {
    client: reqwest::Client,
    api_key: String,
}

impl TwelveDataProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    values: Option<Vec<TimeSeriesValue>>,
    status: String,
    message: Option<String>,
    code: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesValue {
    // "YYYY-MM-DD", or "YYYY-MM-DD HH:MM:SS" in the exchange timezone
    datetime: String,
    close: String,
}

fn parse_time_series(body: TimeSeriesResponse) -> Result<Vec<PricePoint>, PriceProviderError> {
    if body.status != "ok" {
        let message = body.message.unwrap_or_else(|| format!("API returned status: {}", body.status));
        if body.code == Some(429) || message.contains("API rate limit") || message.contains("credits") {
            return Err(PriceProviderError::RateLimited);
        }
        if body.code == Some(404) || message.contains("not found") {
            return Err(PriceProviderError::NotFound);
        }
        return Err(PriceProviderError::BadResponse(message));
    }

    let values = body
        .values
        .ok_or_else(|| PriceProviderError::BadResponse("missing values in response".into()))?;

    let mut points = values
        .into_iter()
        .map(|v| {
            let date_part = v.datetime.split(' ').next().unwrap_or_default();
            let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map_err(|e| PriceProviderError::Parse(e.to_string()))?;
            let close = v
                .close
                .parse::<BigDecimal>()
                .map_err(|e| PriceProviderError::Parse(e.to_string()))?;
            Ok(PricePoint::new(date, close))
        })
        .collect::<Result<Vec<_>, PriceProviderError>>()?;

    // Twelve Data returns newest first
    points.sort_by_key(|p| p.date);

    Ok(points)
}

#[async_trait]
impl PriceProvider for TwelveDataProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        // outputsize counts trading days, max 5000
        let outputsize = days.clamp(1, 5000).to_string();

        let resp = self
            .client
            .get("https://api.twelvedata.com/time_series")
            .query(&[
                ("symbol", ticker),
                ("interval", "1day"),
                ("outputsize", outputsize.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let body: TimeSeriesResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        parse_time_series(body)
    }
}
