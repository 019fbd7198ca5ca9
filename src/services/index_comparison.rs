use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::external::price_provider::PriceProvider;
use crate::models::{ComparisonPoint, ComparisonResult, DataAvailability, PerformancePoint, PricePoint};
use crate::services::returns::{percent_change, round_output};
use crate::services::value_series::{fetch_history, HISTORY_LOOKBACK_DAYS};

/// Benchmark closes restricted to `[start, end]`, keyed by date.
fn closes_between(history: &[PricePoint], start: NaiveDate, end: NaiveDate) -> BTreeMap<NaiveDate, &BigDecimal> {
    history
        .iter()
        .filter(|p| p.date >= start && p.date <= end)
        .map(|p| (p.date, &p.close))
        .collect()
}

/// Re-bases the benchmark to its first close inside the portfolio's date range
/// and keeps only dates present in both series.
pub fn align(portfolio: &[PerformancePoint], index_history: &[PricePoint]) -> Vec<ComparisonPoint> {
    let (Some(first), Some(last)) = (portfolio.first(), portfolio.last()) else {
        return Vec::new();
    };

    let index = closes_between(index_history, first.date, last.date);
    let Some(base) = index.values().next().copied() else {
        return Vec::new();
    };

    let portfolio_by_date: HashMap<NaiveDate, &BigDecimal> = portfolio
        .iter()
        .map(|p| (p.date, &p.change_percent))
        .collect();

    index
        .iter()
        .filter_map(|(date, close)| {
            portfolio_by_date.get(date).map(|portfolio_percent| ComparisonPoint {
                date: *date,
                portfolio_percent: (*portfolio_percent).clone(),
                index_percent: round_output(&percent_change(close, base)),
            })
        })
        .collect()
}

/// History needed to reach from `today` back to `first`, never less than the
/// regular two-year window.
pub fn lookback_days(first: NaiveDate, today: NaiveDate) -> u32 {
    let span = (today - first).num_days() + 1;
    u32::try_from(span.max(0))
        .unwrap_or(u32::MAX)
        .max(HISTORY_LOOKBACK_DAYS)
}

/// Compares a portfolio performance series with a benchmark index.
///
/// The index history requested reaches back to the portfolio's first date.
/// When the provider still returns less than that, the comparison is rebased
/// on the earliest close available and reported as `Partial`.
pub async fn compare(
    provider: &dyn PriceProvider,
    portfolio: &[PerformancePoint],
    index_symbol: &str,
    today: NaiveDate,
) -> ComparisonResult {
    let (Some(first), Some(last)) = (portfolio.first(), portfolio.last()) else {
        return ComparisonResult::empty(DataAvailability::Unavailable);
    };

    let history = fetch_history(provider, index_symbol, lookback_days(first.date, today)).await;
    if closes_between(&history, first.date, last.date).is_empty() {
        warn!(
            "No {} closes between {} and {}, comparison is empty",
            index_symbol, first.date, last.date
        );
        return ComparisonResult::empty(DataAvailability::Unavailable);
    }

    let data = align(portfolio, &history);
    info!(
        "Compared {} portfolio points with {}: {} matching dates",
        portfolio.len(),
        index_symbol,
        data.len()
    );

    let truncated = history.first().is_some_and(|p| p.date > first.date);
    let availability = if truncated {
        warn!(
            "{} history starts after {}, comparison rebased on a later close",
            index_symbol, first.date
        );
        DataAvailability::Partial {
            missing_symbols: vec![index_symbol.to_string()],
        }
    } else {
        DataAvailability::Complete
    };

    ComparisonResult { data, availability }
}
