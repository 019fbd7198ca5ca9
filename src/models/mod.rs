mod position;
mod price_point;
mod performance;
mod capital;
mod alert;
mod decimal;

pub use position::{CreatePosition, Position};
pub use price_point::PricePoint;
pub use performance::{
    ComparisonPoint, ComparisonResult, DataAvailability, Period, PerformancePoint,
    PerformanceResult, ValueSeries,
};
pub use capital::{CapitalContribution, CapitalSummary, CreateCapitalContribution, FlowType};
pub use alert::{Alert, AlertType, TriggeredAlert};
