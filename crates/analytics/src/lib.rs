//! # Meridian Analytics Engine
//!
//! This crate turns raw trading activity into risk and return metrics.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` takes materialized inputs and
//!   returns plain value objects. Missing data produces zeroed figures, never an error.
//!
//! ## Public API
//!
//! - `AnalyticsEngine::compute_metrics`: execution list to `PerformanceMetrics`.
//! - `AnalyticsEngine::advanced_metrics`: equity curve and trades to `AdvancedMetrics`.
//! - `drawdown_series`: running-peak drawdown of any value series.
//! - `rounding`: the fixed output precisions of `PerformanceMetrics`.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;
pub mod risk;
pub mod rounding;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{drawdown_series, execution_pnl, AnalyticsEngine};
pub use report::{AdvancedMetrics, BacktestPerformance, MonthlyReturn, PerformanceMetrics};
