use std::collections::BTreeMap;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::PricePoint;

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, DailyBar>>,

    // Throttle response: { "Note": "Thank you for using Alpha Vantage! ..." }
    #[serde(rename = "Note")]
    note: Option<String>,

    #[serde(rename = "Information")]
    information: Option<String>,

    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

fn parse_daily(body: DailyResponse, days: u32) -> Result<Vec<PricePoint>, PriceProviderError> {
    if body.note.is_some() || body.information.is_some() {
        return Err(PriceProviderError::RateLimited);
    }

    if let Some(msg) = body.error_message {
        if msg.contains("Invalid API call") {
            return Err(PriceProviderError::NotFound);
        }
        return Err(PriceProviderError::BadResponse(msg));
    }

    let series = body
        .time_series
        .ok_or_else(|| PriceProviderError::BadResponse("missing time series".into()))?;

    // BTreeMap keyed by "YYYY-MM-DD" already iterates oldest first
    let mut points = series
        .into_iter()
        .map(|(date, bar)| {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| PriceProviderError::Parse(e.to_string()))?;
            let close = bar
                .close
                .parse::<BigDecimal>()
                .map_err(|e| PriceProviderError::Parse(e.to_string()))?;
            Ok(PricePoint::new(date, close))
        })
        .collect::<Result<Vec<_>, PriceProviderError>>()?;

    let keep = days as usize;
    if keep > 0 && points.len() > keep {
        points.drain(..points.len() - keep);
    }

    Ok(points)
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        // compact is the latest ~100 points, full is 20+ years
        let outputsize = if days <= 100 { "compact" } else { "full" };

        let resp = self
            .client
            .get("https://www.alphavantage.co/query")
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", ticker),
                ("outputsize", outputsize),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let body = resp
            .json::<DailyResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        parse_daily(body, days)
    }
}
