use async_trait::async_trait;
use bigdecimal::{BigDecimal, FromPrimitive};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::PricePoint;

/// Synthetic random-walk closes for offline runs and demos.
///
/// Each ticker gets its own seed and every walk starts on 1970-01-01, so a
/// ticker has one close per date whatever `days` is requested. Weekends are
/// skipped.
pub struct MockProvider {
    today: Option<NaiveDate>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self { today: None }
    }

    /// Pins the last generated date instead of using the current UTC date.
    pub fn ending_on(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    fn seed_for(ticker: &str) -> u64 {
        ticker
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
        let first_wanted = today - Duration::days(i64::from(days) - 1);
        let walk_start = DateTime::<Utc>::UNIX_EPOCH.date_naive().min(first_wanted);

        let mut rng = StdRng::seed_from_u64(Self::seed_for(ticker));
        let mut current = 100.0_f64;
        let mut points = Vec::new();

        for date in walk_start.iter_days().take_while(|d| *d <= today) {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }

            current *= 1.0 + (rng.random::<f64>() - 0.5) * 0.02;
            if date < first_wanted {
                continue;
            }

            let close = BigDecimal::from_f64(current)
                .ok_or_else(|| PriceProviderError::Parse(format!("bad synthetic close {}", current)))?
                .round(4);
            points.push(PricePoint::new(date, close));
        }

        Ok(points)
    }
}
