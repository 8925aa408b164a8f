//! Sales performance analysis and demand forecasting
//!
//! Every function takes `today` explicitly; nothing here reads the clock.

pub mod center;
pub mod performance;
pub mod period;
pub mod predictor;

pub use center::{DateRange, PerformanceCenter, SummaryStats};
pub use performance::PerformanceAnalyzer;
pub use period::{following_period_labels, infer_granularity, next_period_label, period_key};
pub use predictor::Predictor;
