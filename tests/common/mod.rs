use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use rustfolio_performance::external::price_provider::{PriceProvider, PriceProviderError};
use rustfolio_performance::models::{CreatePosition, Position, PricePoint};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

pub fn position(symbol: &str, quantity: &str, price: &str, purchased: NaiveDate) -> Position {
    Position::new(CreatePosition {
        symbol: symbol.to_string(),
        quantity: dec(quantity),
        purchase_price: dec(price),
        purchase_date: purchased,
    })
    .unwrap()
}

/// In-memory provider returning canned histories and recording each request.
#[derive(Default)]
pub struct ScriptedProvider {
    histories: HashMap<String, Result<Vec<PricePoint>, PriceProviderError>>,
    requests: Mutex<Vec<(String, u32)>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_closes(mut self, ticker: &str, closes: &[(NaiveDate, &str)]) -> Self {
        let points = closes.iter().map(|(d, c)| PricePoint::new(*d, dec(c))).collect();
        self.histories.insert(ticker.to_string(), Ok(points));
        self
    }

    pub fn with_error(mut self, ticker: &str, error: PriceProviderError) -> Self {
        self.histories.insert(ticker.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Lookbacks requested for `ticker`, in call order.
    pub fn requested_days(&self, ticker: &str) -> Vec<u32> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == ticker)
            .map(|(_, days)| *days)
            .collect()
    }
}

#[async_trait]
impl PriceProvider for ScriptedProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        self.requests.lock().unwrap().push((ticker.to_string(), days));
        self.histories
            .get(ticker)
            .cloned()
            .unwrap_or(Err(PriceProviderError::NotFound))
    }
}
