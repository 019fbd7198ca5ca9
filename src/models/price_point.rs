use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One daily close for a ticker. Dates are exchange-local calendar dates with no time-of-day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: BigDecimal,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: BigDecimal) -> Self {
        Self { date, close }
    }
}
