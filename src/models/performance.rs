use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::decimal;

/// Coarse date-range selector supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl Period {
    /// Fixed-day lookback for the rolling periods. Not calendar-month arithmetic.
    pub fn lookback_days(self) -> Option<i64> {
        match self {
            Period::OneMonth => Some(30),
            Period::ThreeMonths => Some(90),
            Period::SixMonths => Some(180),
            Period::OneYear => Some(365),
            Period::All | Period::YearToDate => None,
        }
    }

    /// Lenient parse: anything unrecognized selects the whole holding period.
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown period token '{}', using 'all'", token);
            Period::All
        })
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Period::All),
            "ytd" => Ok(Period::YearToDate),
            "1m" => Ok(Period::OneMonth),
            "3m" => Ok(Period::ThreeMonths),
            "6m" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            other => Err(AppError::Validation(format!("Unknown period: {}", other))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Period::All => "all",
            Period::YearToDate => "ytd",
            Period::OneMonth => "1m",
            Period::ThreeMonths => "3m",
            Period::SixMonths => "6m",
            Period::OneYear => "1y",
        };
        f.write_str(token)
    }
}

/// Whether a result was computed from all the market data it asked for.
///
/// `Complete` with zero returns means the holdings really did not move;
/// `Unavailable` means there was nothing to compute from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DataAvailability {
    Complete,
    Partial { missing_symbols: Vec<String> },
    Unavailable,
}

impl DataAvailability {
    pub fn from_missing(requested: usize, missing_symbols: Vec<String>) -> Self {
        if missing_symbols.is_empty() {
            DataAvailability::Complete
        } else if missing_symbols.len() >= requested {
            DataAvailability::Unavailable
        } else {
            DataAvailability::Partial { missing_symbols }
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, DataAvailability::Complete)
    }
}

/// Aggregate holding value per trading date, in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSeries {
    values: BTreeMap<NaiveDate, BigDecimal>,
}

impl ValueSeries {
    pub(crate) fn from_map(values: BTreeMap<NaiveDate, BigDecimal>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&BigDecimal> {
        self.values.get(date)
    }

    pub fn first(&self) -> Option<(&NaiveDate, &BigDecimal)> {
        self.values.iter().next()
    }

    pub fn last(&self) -> Option<(&NaiveDate, &BigDecimal)> {
        self.values.iter().next_back()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &BigDecimal)> {
        self.values.iter()
    }
}

/// Values landing on the same date are summed.
impl FromIterator<(NaiveDate, BigDecimal)> for ValueSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, BigDecimal)>>(iter: I) -> Self {
        let mut values: BTreeMap<NaiveDate, BigDecimal> = BTreeMap::new();
        for (date, value) in iter {
            *values.entry(date).or_insert_with(BigDecimal::zero) += value;
        }
        Self { values }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    #[serde(serialize_with = "decimal::as_number")]
    pub value: BigDecimal,
    #[serde(serialize_with = "decimal::as_number")]
    pub change_percent: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceResult {
    pub data: Vec<PerformancePoint>,
    #[serde(serialize_with = "decimal::as_number")]
    pub total_return: BigDecimal,
    #[serde(serialize_with = "decimal::as_number")]
    pub total_return_percent: BigDecimal,
    pub availability: DataAvailability,
}

impl PerformanceResult {
    pub fn empty(availability: DataAvailability) -> Self {
        Self {
            data: Vec::new(),
            total_return: BigDecimal::zero(),
            total_return_percent: BigDecimal::zero(),
            availability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPoint {
    pub date: NaiveDate,
    #[serde(serialize_with = "decimal::as_number")]
    pub portfolio_percent: BigDecimal,
    #[serde(serialize_with = "decimal::as_number")]
    pub index_percent: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub data: Vec<ComparisonPoint>,
    pub availability: DataAvailability,
}

impl ComparisonResult {
    pub fn empty(availability: DataAvailability) -> Self {
        Self { data: Vec::new(), availability }
    }
}
