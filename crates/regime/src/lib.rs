//! # Meridian Regime Segmenter
//!
//! Splits trading history into market-regime periods and reports how the
//! strategy performed inside each of them.
//!
//! - `build_periods`: ordered regime-change events into `RegimePeriod`s.
//! - `assign_executions`: executions grouped under the regime active at their timestamp.
//! - `regime_performance`: `PerformanceMetrics` per regime, including known regimes
//!   that saw no executions.

pub mod period;
pub mod segmenter;

pub use period::{build_periods, RegimePeriod};
pub use segmenter::{assign_executions, regime_performance, RegimePerformance, UNKNOWN_REGIME};
