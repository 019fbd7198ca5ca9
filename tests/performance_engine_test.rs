/// Performance engine end-to-end tests
///
/// Drives the public performance operations against a scripted in-memory
/// price provider: portfolio and position performance, index comparison and
/// degraded-data reporting.

mod common;

use bigdecimal::{BigDecimal, Zero};
use common::{date, dec, position, ScriptedProvider};
use rustfolio_performance::external::mock_provider::MockProvider;
use rustfolio_performance::external::price_provider::PriceProviderError;
use rustfolio_performance::models::{DataAvailability, Period, PerformancePoint};
use rustfolio_performance::services::performance_service::{
    calculate_portfolio_performance, calculate_position_performance, compare_with_index,
};

// ---------------------------------------------------------------------------
// Portfolio performance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_single_holding_all_period() {
    let provider = ScriptedProvider::new()
        .with_closes("AAPL", &[(date(2024, 1, 1), "150"), (date(2024, 1, 2), "165")]);
    let positions = vec![position("AAPL", "10", "150", date(2024, 1, 1))];

    let result = calculate_portfolio_performance(&provider, &positions, Period::All, date(2024, 1, 3)).await;

    assert_eq!(result.data.len(), 2);
    assert_eq!(result.data[0].date, date(2024, 1, 1));
    assert_eq!(result.data[0].value, dec("1500"));
    assert!(result.data[0].change_percent.is_zero());
    assert_eq!(result.data[1].value, dec("1650"));
    assert_eq!(result.data[1].change_percent, dec("10.0"));
    assert_eq!(result.total_return, dec("150"));
    assert_eq!(result.total_return_percent, dec("10.0"));
    assert_eq!(result.availability, DataAvailability::Complete);
    assert_eq!(provider.requested_days("AAPL"), vec![730]);
}

#[tokio::test]
async fn test_empty_positions_never_call_provider() {
    let provider = ScriptedProvider::new();

    let result = calculate_portfolio_performance(&provider, &[], Period::OneYear, date(2024, 6, 1)).await;

    assert!(result.data.is_empty());
    assert!(result.total_return.is_zero());
    assert!(result.total_return_percent.is_zero());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_total_percent_matches_last_point() {
    let provider = ScriptedProvider::new()
        .with_closes("MSFT", &[(date(2024, 2, 1), "400"), (date(2024, 2, 2), "390"), (date(2024, 2, 5), "412.37")])
        .with_closes("VTI", &[(date(2024, 2, 1), "240"), (date(2024, 2, 2), "241.5"), (date(2024, 2, 5), "238.9")]);
    let positions = vec![
        position("MSFT", "3", "380", date(2024, 1, 15)),
        position("VTI", "7.5", "235", date(2024, 1, 20)),
    ];

    let result = calculate_portfolio_performance(&provider, &positions, Period::All, date(2024, 2, 6)).await;

    let last: &PerformancePoint = result.data.last().unwrap();
    assert_eq!(result.total_return_percent, last.change_percent);
    assert!(result.data[0].change_percent.is_zero());
    assert_eq!(result.availability, DataAvailability::Complete);
}

#[tokio::test]
async fn test_duplicate_symbols_are_fetched_once_and_summed() {
    let provider = ScriptedProvider::new()
        .with_closes("AAPL", &[(date(2024, 1, 1), "100"), (date(2024, 1, 2), "110")]);
    let positions = vec![
        position("AAPL", "1", "90", date(2023, 6, 1)),
        position("aapl", "2", "95", date(2023, 9, 1)),
    ];

    let result = calculate_portfolio_performance(&provider, &positions, Period::All, date(2024, 1, 3)).await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(result.data[0].value, dec("300"));
    assert_eq!(result.data[1].value, dec("330"));
    assert_eq!(result.total_return, dec("30"));
}

#[tokio::test]
async fn test_rolling_period_drops_older_points() {
    let provider = ScriptedProvider::new().with_closes(
        "SPY",
        &[(date(2024, 1, 2), "470"), (date(2024, 2, 20), "500"), (date(2024, 3, 1), "510")],
    );
    let positions = vec![position("SPY", "1", "400", date(2023, 1, 3))];

    let result = calculate_portfolio_performance(&provider, &positions, Period::OneMonth, date(2024, 3, 5)).await;

    assert_eq!(result.data.len(), 2);
    assert_eq!(result.data[0].date, date(2024, 2, 20));
    assert_eq!(result.total_return, dec("10"));
    assert_eq!(result.total_return_percent, dec("2"));
}

// ---------------------------------------------------------------------------
// Degraded data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_failed_symbol_is_reported_as_partial() {
    let provider = ScriptedProvider::new()
        .with_closes("AAPL", &[(date(2024, 1, 1), "150"), (date(2024, 1, 2), "165")])
        .with_error("DELISTED", PriceProviderError::NotFound);
    let positions = vec![
        position("AAPL", "10", "150", date(2024, 1, 1)),
        position("DELISTED", "5", "20", date(2024, 1, 1)),
    ];

    let result = calculate_portfolio_performance(&provider, &positions, Period::All, date(2024, 1, 3)).await;

    assert_eq!(result.data.len(), 2);
    assert_eq!(result.total_return, dec("150"));
    assert_eq!(
        result.availability,
        DataAvailability::Partial { missing_symbols: vec!["DELISTED".to_string()] }
    );
}

#[tokio::test]
async fn test_all_symbols_failing_yields_unavailable_zero_result() {
    let provider = ScriptedProvider::new()
        .with_error("AAPL", PriceProviderError::RateLimited)
        .with_error("MSFT", PriceProviderError::Network("connection reset".into()));
    let positions = vec![
        position("AAPL", "10", "150", date(2024, 1, 1)),
        position("MSFT", "1", "300", date(2024, 1, 1)),
    ];

    let result = calculate_portfolio_performance(&provider, &positions, Period::All, date(2024, 1, 3)).await;

    assert!(result.data.is_empty());
    assert!(result.total_return.is_zero());
    assert_eq!(result.availability, DataAvailability::Unavailable);
    assert!(result.availability.is_degraded());
}

// ---------------------------------------------------------------------------
// Position performance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_position_is_measured_from_cost_basis() {
    let provider = ScriptedProvider::new()
        .with_closes("NVDA", &[(date(2024, 3, 1), "110"), (date(2024, 3, 4), "120")]);
    let holding = position("NVDA", "4", "100", date(2024, 3, 1));

    let result = calculate_position_performance(&provider, &holding, Period::All, date(2024, 3, 5)).await;

    assert_eq!(result.data[0].value, dec("440"));
    assert_eq!(result.data[0].change_percent, dec("10"));
    assert_eq!(result.total_return, dec("80"));
    assert_eq!(result.total_return_percent, dec("20"));
}

#[tokio::test]
async fn test_position_window_starts_at_purchase() {
    let provider = ScriptedProvider::new().with_closes(
        "AMD",
        &[(date(2024, 1, 2), "140"), (date(2024, 4, 1), "180"), (date(2024, 4, 2), "171")],
    );
    let holding = position("AMD", "2", "180", date(2024, 4, 1));

    let result = calculate_position_performance(&provider, &holding, Period::OneYear, date(2024, 4, 3)).await;

    assert_eq!(result.data.len(), 2);
    assert_eq!(result.data[0].date, date(2024, 4, 1));
    assert_eq!(result.total_return, dec("-18"));
    assert_eq!(result.total_return_percent, dec("-5"));
}

#[tokio::test]
async fn test_position_without_data_is_unavailable() {
    let provider = ScriptedProvider::new();
    let holding = position("ZZZZ", "1", "10", date(2024, 1, 1));

    let result = calculate_position_performance(&provider, &holding, Period::All, date(2024, 2, 1)).await;

    assert!(result.data.is_empty());
    assert_eq!(result.availability, DataAvailability::Unavailable);
}

// ---------------------------------------------------------------------------
// Index comparison
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_comparison_rebases_index() {
    let provider = ScriptedProvider::new()
        .with_closes("^GSPC", &[(date(2024, 1, 1), "4000"), (date(2024, 1, 2), "4120")]);
    let portfolio = vec![
        PerformancePoint { date: date(2024, 1, 1), value: dec("1000"), change_percent: BigDecimal::zero() },
        PerformancePoint { date: date(2024, 1, 2), value: dec("1050"), change_percent: dec("5") },
    ];

    let result = compare_with_index(&provider, &portfolio, "^GSPC", date(2024, 1, 3)).await;

    assert_eq!(result.availability, DataAvailability::Complete);
    assert_eq!(result.data.len(), 2);
    assert!(result.data[0].portfolio_percent.is_zero());
    assert!(result.data[0].index_percent.is_zero());
    assert_eq!(result.data[1].portfolio_percent, dec("5"));
    assert_eq!(result.data[1].index_percent, dec("3"));
}

#[tokio::test]
async fn test_comparison_feeds_from_portfolio_result() {
    let provider = ScriptedProvider::new()
        .with_closes("AAPL", &[(date(2024, 1, 1), "150"), (date(2024, 1, 2), "165"), (date(2024, 1, 3), "160")])
        .with_closes("^GSPC", &[(date(2024, 1, 1), "4000"), (date(2024, 1, 3), "4040")]);
    let positions = vec![position("AAPL", "10", "150", date(2024, 1, 1))];

    let performance = calculate_portfolio_performance(&provider, &positions, Period::All, date(2024, 1, 4)).await;
    let comparison = compare_with_index(&provider, &performance.data, "^GSPC", date(2024, 1, 4)).await;

    let dates: Vec<_> = comparison.data.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 3)]);
    assert!(comparison.data.len() <= performance.data.len().min(2));
    assert_eq!(comparison.data[1].index_percent, dec("1"));
}

#[tokio::test]
async fn test_comparison_without_index_data_is_unavailable() {
    let provider = ScriptedProvider::new().with_error("^GSPC", PriceProviderError::RateLimited);
    let portfolio = vec![PerformancePoint {
        date: date(2024, 1, 1),
        value: dec("1"),
        change_percent: BigDecimal::zero(),
    }];

    let result = compare_with_index(&provider, &portfolio, "^GSPC", date(2024, 1, 2)).await;

    assert!(result.data.is_empty());
    assert_eq!(result.availability, DataAvailability::Unavailable);

    let empty = compare_with_index(&provider, &[], "^GSPC", date(2024, 1, 2)).await;
    assert!(empty.data.is_empty());
}

fn flat_portfolio(dates: &[chrono::NaiveDate]) -> Vec<PerformancePoint> {
    dates
        .iter()
        .map(|d| PerformancePoint { date: *d, value: dec("1000"), change_percent: BigDecimal::zero() })
        .collect()
}

#[tokio::test]
async fn test_comparison_requests_history_back_to_first_point() {
    let provider = ScriptedProvider::new()
        .with_closes("^GSPC", &[(date(2021, 6, 1), "4200"), (date(2024, 6, 28), "5460")]);
    let portfolio = flat_portfolio(&[date(2021, 6, 1), date(2024, 6, 28)]);

    let result = compare_with_index(&provider, &portfolio, "^GSPC", date(2024, 6, 28)).await;

    assert_eq!(provider.requested_days("^GSPC"), vec![1124]);
    assert_eq!(result.data.len(), 2);
    assert_eq!(result.data[1].index_percent, dec("30"));
    assert_eq!(result.availability, DataAvailability::Complete);
}

#[tokio::test]
async fn test_comparison_keeps_points_older_than_two_years() {
    let today = date(2024, 6, 28);
    let provider = MockProvider::ending_on(today);
    let portfolio = flat_portfolio(&[date(2021, 6, 1), today]);

    let result = compare_with_index(&provider, &portfolio, "^GSPC", today).await;

    let dates: Vec<_> = result.data.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![date(2021, 6, 1), today]);
    assert!(result.data[0].index_percent.is_zero());
    assert_eq!(result.availability, DataAvailability::Complete);
}

#[tokio::test]
async fn test_short_index_history_is_partial() {
    let provider = ScriptedProvider::new()
        .with_closes("^GSPC", &[(date(2024, 1, 3), "100"), (date(2024, 1, 4), "105")]);
    let portfolio = flat_portfolio(&[date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]);

    let result = compare_with_index(&provider, &portfolio, "^GSPC", date(2024, 1, 5)).await;

    assert_eq!(result.data.len(), 2);
    assert!(result.data[0].index_percent.is_zero());
    assert_eq!(result.data[1].index_percent, dec("5"));
    assert_eq!(
        result.availability,
        DataAvailability::Partial { missing_symbols: vec!["^GSPC".to_string()] }
    );
}

// ---------------------------------------------------------------------------
// Models through the crate's public re-exports
// ---------------------------------------------------------------------------

#[test]
fn test_alerts_are_usable_from_models() {
    use rustfolio_performance::models::{Alert, AlertType};
    use rustfolio_performance::services::alert_service::check_price_alerts;

    let alerts = vec![Alert::new("AAPL", AlertType::PriceBelow, 140.0)];
    let triggered = check_price_alerts(139.0, &alerts);

    assert_eq!(triggered.len(), 1);
    assert_eq!(triggered[0].alert_type, AlertType::PriceBelow);
}

