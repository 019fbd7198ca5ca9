pub mod time_window;
pub mod value_series;
pub mod returns;
pub mod index_comparison;
pub mod performance_service;
pub mod alert_service;
pub mod capital_service;
pub mod csv_import_service;
pub mod failure_cache;
pub mod rate_limiter;
