use std::collections::BTreeMap;

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::external::price_provider::PriceProvider;
use crate::models::{DataAvailability, Position, PricePoint, ValueSeries};

/// History requested per symbol; covers every supported period.
pub const HISTORY_LOOKBACK_DAYS: u32 = 730;

/// Fetches `days` of a symbol's daily closes, treating any provider failure as "no data".
pub async fn fetch_history(provider: &dyn PriceProvider, symbol: &str, days: u32) -> Vec<PricePoint> {
    match provider.fetch_daily_history(symbol, days).await {
        Ok(points) => {
            if points.is_empty() {
                warn!("No price history returned for {}", symbol);
            }
            points
        }
        Err(e) => {
            warn!("Price history unavailable for {}: {}", symbol, e);
            Vec::new()
        }
    }
}

/// Accumulates `close × quantity` per date from `start` onwards.
#[derive(Debug)]
pub struct ValueSeriesBuilder {
    start: NaiveDate,
    values: BTreeMap<NaiveDate, BigDecimal>,
}

impl ValueSeriesBuilder {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            values: BTreeMap::new(),
        }
    }

    /// Adds one holding's history. Returns how many points fell inside the window.
    pub fn add(&mut self, quantity: &BigDecimal, history: &[PricePoint]) -> usize {
        let mut added = 0;
        for point in history.iter().filter(|p| p.date >= self.start) {
            *self.values.entry(point.date).or_insert_with(BigDecimal::zero) += &point.close * quantity;
            added += 1;
        }
        added
    }

    pub fn finish(self) -> ValueSeries {
        ValueSeries::from_map(self.values)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSeries {
    pub series: ValueSeries,
    pub availability: DataAvailability,
}

/// Builds the aggregate value series for `positions` from `start` onwards.
///
/// History is fetched once per distinct symbol, in order of first appearance.
/// Symbols without history inside the window are skipped and reported in the
/// availability; they never fail the build.
pub async fn build(provider: &dyn PriceProvider, positions: &[Position], start: NaiveDate) -> BuiltSeries {
    let mut symbols: Vec<&str> = Vec::new();
    for position in positions {
        if !symbols.contains(&position.symbol.as_str()) {
            symbols.push(&position.symbol);
        }
    }

    let mut builder = ValueSeriesBuilder::new(start);
    let mut missing = Vec::new();

    for symbol in &symbols {
        let history = fetch_history(provider, symbol, HISTORY_LOOKBACK_DAYS).await;

        let added: usize = positions
            .iter()
            .filter(|p| p.symbol == *symbol)
            .map(|p| builder.add(&p.quantity, &history))
            .sum();

        if added == 0 {
            if !history.is_empty() {
                debug!("{} has no price points on or after {}", symbol, start);
            }
            missing.push(symbol.to_string());
        }
    }

    let series = builder.finish();
    let availability = DataAvailability::from_missing(symbols.len(), missing);
    if availability.is_degraded() {
        warn!("Value series built with degraded data: {:?}", availability);
    }

    BuiltSeries { series, availability }
}
