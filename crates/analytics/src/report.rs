use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Summary statistics derived from a list of executions.
///
/// This is the output of `AnalyticsEngine::compute_metrics` and the unit the
/// regime segmenter aggregates per regime. An empty input yields the
/// all-zero `Default` value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_return: Decimal,
    pub sharpe_ratio: Decimal,
    /// Largest decline of cumulative PnL from its running peak, in percent.
    pub max_drawdown: Decimal,
    /// Share of executions with positive PnL, in percent.
    pub win_rate: Decimal,
    pub profit_factor: Decimal,
    pub average_win: Decimal,
    pub average_loss: Decimal,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
}

/// The performance summary attached to a finished backtest run.
///
/// Unlike `PerformanceMetrics` these figures are relative to the run's
/// starting capital and are produced by the backtest service itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestPerformance {
    pub total_return_pct: Decimal,
    pub sharpe_ratio: Decimal,
    pub max_drawdown_pct: Decimal,
    pub win_rate: Decimal,
    #[serde(default)]
    pub profit_factor: Decimal,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
}

/// The return of a single calendar month of the equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReturn {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    pub return_pct: Decimal,
}

/// Secondary risk measures for a single backtest run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedMetrics {
    /// RMS of the per-point drawdowns in percent points (a 5% drawdown
    /// contributes 5, not 0.05).
    pub ulcer_index: Decimal,
    pub gain_to_pain_ratio: Decimal,
    pub recovery_factor: Decimal,

    pub monthly_returns: Vec<MonthlyReturn>,
    pub average_monthly_return: Decimal,
    pub best_month: Decimal,
    pub worst_month: Decimal,

    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    pub probability_of_success: Decimal,
}
