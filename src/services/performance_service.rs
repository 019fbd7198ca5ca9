use chrono::NaiveDate;
use tracing::{info, warn};

use crate::external::price_provider::PriceProvider;
use crate::models::{ComparisonResult, DataAvailability, PerformancePoint, PerformanceResult, Period, Position, PricePoint};
use crate::services::time_window::{self, Anchor};
use crate::services::{index_comparison, returns, value_series};

/// Value and return of a whole portfolio over `period`, ending `today`.
///
/// Never fails on market data: missing symbols are skipped and reported in
/// `availability`, and no data at all yields an empty zero result.
pub async fn calculate_portfolio_performance(
    provider: &dyn PriceProvider,
    positions: &[Position],
    period: Period,
    today: NaiveDate,
) -> PerformanceResult {
    if positions.is_empty() {
        return PerformanceResult::empty(DataAvailability::Complete);
    }

    let window = time_window::resolve(period, Anchor::portfolio(positions), today);
    info!(
        "Calculating portfolio performance for {} positions, period {} ({} to {})",
        positions.len(),
        period,
        window.start,
        window.end
    );

    let built = value_series::build(provider, positions, window.start).await;
    if built.series.is_empty() {
        warn!("No market data for any position since {}", window.start);
        return PerformanceResult::empty(built.availability);
    }

    PerformanceResult {
        availability: built.availability,
        ..returns::compute(&built.series)
    }
}

/// Value and return of a single holding, measured against its cost basis.
pub async fn calculate_position_performance(
    provider: &dyn PriceProvider,
    position: &Position,
    period: Period,
    today: NaiveDate,
) -> PerformanceResult {
    let window = time_window::resolve(period, Anchor::Position(position.purchase_date), today);
    info!(
        "Calculating performance for {}, period {} ({} to {})",
        position.symbol, period, window.start, window.end
    );

    let history =
        value_series::fetch_history(provider, &position.symbol, value_series::HISTORY_LOOKBACK_DAYS).await;
    let in_window: Vec<PricePoint> = history
        .into_iter()
        .filter(|p| p.date >= window.start)
        .collect();

    if in_window.is_empty() {
        warn!("No price data for {} since {}", position.symbol, window.start);
        return PerformanceResult::empty(DataAvailability::Unavailable);
    }

    returns::compute_position(&in_window, &position.quantity, &position.purchase_price)
}

/// Portfolio change versus a benchmark index on the dates both have.
pub async fn compare_with_index(
    provider: &dyn PriceProvider,
    portfolio: &[PerformancePoint],
    index_symbol: &str,
    today: NaiveDate,
) -> ComparisonResult {
    index_comparison::compare(provider, portfolio, index_symbol, today).await
}
