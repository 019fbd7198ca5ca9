use bigdecimal::{BigDecimal, Zero};

use crate::models::{DataAvailability, PerformancePoint, PerformanceResult, PricePoint, ValueSeries};

/// Decimal places for every emitted amount and percentage.
const OUTPUT_SCALE: i64 = 2;

pub(crate) fn round_output(value: &BigDecimal) -> BigDecimal {
    value.round(OUTPUT_SCALE)
}

/// Percent change of `value` against `base`; zero when the base is not positive.
pub(crate) fn percent_change(value: &BigDecimal, base: &BigDecimal) -> BigDecimal {
    if *base <= BigDecimal::zero() {
        return BigDecimal::zero();
    }
    (value - base) / base * BigDecimal::from(100)
}

fn point(date: chrono::NaiveDate, value: &BigDecimal, baseline: &BigDecimal) -> PerformancePoint {
    PerformancePoint {
        date,
        value: round_output(value),
        change_percent: round_output(&percent_change(value, baseline)),
    }
}

fn totals(last: &BigDecimal, baseline: &BigDecimal) -> (BigDecimal, BigDecimal) {
    (
        round_output(&(last - baseline)),
        round_output(&percent_change(last, baseline)),
    )
}

/// Performance of an aggregate series measured from its first value.
pub fn compute(series: &ValueSeries) -> PerformanceResult {
    let (Some((_, initial)), Some((_, last))) = (series.first(), series.last()) else {
        return PerformanceResult::empty(DataAvailability::Complete);
    };

    let data = series
        .iter()
        .map(|(date, value)| point(*date, value, initial))
        .collect();
    let (total_return, total_return_percent) = totals(last, initial);

    PerformanceResult {
        data,
        total_return,
        total_return_percent,
        availability: DataAvailability::Complete,
    }
}

/// Performance of one holding measured from its cost basis rather than the
/// first available market price.
pub fn compute_position(
    history: &[PricePoint],
    quantity: &BigDecimal,
    purchase_price: &BigDecimal,
) -> PerformanceResult {
    let baseline = purchase_price * quantity;
    let values: Vec<(chrono::NaiveDate, BigDecimal)> = history
        .iter()
        .map(|p| (p.date, &p.close * quantity))
        .collect();

    let Some((_, last)) = values.last() else {
        return PerformanceResult::empty(DataAvailability::Complete);
    };

    let (total_return, total_return_percent) = totals(last, &baseline);
    let data = values
        .iter()
        .map(|(date, value)| point(*date, value, &baseline))
        .collect();

    PerformanceResult {
        data,
        total_return,
        total_return_percent,
        availability: DataAvailability::Complete,
    }
}
