use crate::models::{Alert, AlertType, TriggeredAlert};

fn trigger(alert: &Alert, current: f64, message: String) -> TriggeredAlert {
    TriggeredAlert {
        alert_id: alert.id,
        symbol: alert.symbol.clone(),
        alert_type: alert.alert_type,
        target: alert.target_value,
        current,
        message,
    }
}

/// Price alerts reached by `current_price`. Targets are inclusive.
pub fn check_price_alerts(current_price: f64, alerts: &[Alert]) -> Vec<TriggeredAlert> {
    alerts
        .iter()
        .filter(|a| a.is_armed())
        .filter(|a| match a.alert_type {
            AlertType::PriceAbove => current_price >= a.target_value,
            AlertType::PriceBelow => current_price <= a.target_value,
            AlertType::VolatilityHigh => false,
        })
        .map(|a| {
            let message = format!(
                "{} has reached {} (target: {})",
                a.symbol, current_price, a.target_value
            );
            trigger(a, current_price, message)
        })
        .collect()
}

/// Volatility alerts whose threshold (in percent) `volatility` meets or exceeds.
pub fn check_volatility_alerts(volatility: f64, alerts: &[Alert]) -> Vec<TriggeredAlert> {
    alerts
        .iter()
        .filter(|a| a.is_armed())
        .filter(|a| a.alert_type == AlertType::VolatilityHigh && volatility >= a.target_value)
        .map(|a| {
            let message = format!(
                "{} volatility is {}% (threshold: {}%)",
                a.symbol, volatility, a.target_value
            );
            trigger(a, volatility, message)
        })
        .collect()
}
