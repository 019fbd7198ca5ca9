use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    PriceAbove,
    PriceBelow,
    VolatilityHigh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub symbol: String,
    pub alert_type: AlertType,
    pub target_value: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_triggered: bool,
}

fn default_active() -> bool {
    true
}

impl Alert {
    pub fn new(symbol: &str, alert_type: AlertType, target_value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.to_uppercase(),
            alert_type,
            target_value,
            is_active: true,
            is_triggered: false,
        }
    }

    /// Alerts fire once; a triggered or disabled alert is skipped.
    pub fn is_armed(&self) -> bool {
        self.is_active && !self.is_triggered
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredAlert {
    pub alert_id: Uuid,
    pub symbol: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub target: f64,
    pub current: f64,
    pub message: String,
}
