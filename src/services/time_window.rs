use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Period, Position};

/// Days covered by `all` when a portfolio has no purchase dates to anchor on.
const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// `[start, end)` range a performance series is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// What the window is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// A single holding, identified by its purchase date.
    Position(NaiveDate),
    /// A whole portfolio, identified by its earliest purchase date (if any).
    Portfolio(Option<NaiveDate>),
}

impl Anchor {
    pub fn portfolio(positions: &[Position]) -> Self {
        Anchor::Portfolio(positions.iter().map(|p| p.purchase_date).min())
    }
}

pub fn resolve(period: Period, anchor: Anchor, today: NaiveDate) -> TimeWindow {
    let period_start = match period {
        Period::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        Period::All => match anchor {
            Anchor::Position(purchased) => purchased,
            Anchor::Portfolio(Some(earliest)) => earliest,
            Anchor::Portfolio(None) => today - Duration::days(DEFAULT_LOOKBACK_DAYS),
        },
        rolling => today - Duration::days(rolling.lookback_days().unwrap_or(DEFAULT_LOOKBACK_DAYS)),
    };

    // A position has no performance before it was bought.
    let start = match anchor {
        Anchor::Position(purchased) => period_start.max(purchased),
        Anchor::Portfolio(_) => period_start,
    };

    TimeWindow { start, end: today }
}
