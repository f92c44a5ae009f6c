use crate::report::PerformanceMetrics;
use crate::rounding::{
    round_to, AVERAGE_TRADE_DECIMALS, MAX_DRAWDOWN_DECIMALS, PROFIT_FACTOR_DECIMALS,
    SHARPE_RATIO_DECIMALS, WIN_RATE_DECIMALS,
};
use core_types::{Execution, ExecutionSide};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// A stateless calculator for deriving performance metrics from trading activity.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarizes a list of executions into a `PerformanceMetrics`.
    ///
    /// Each execution is valued on its own: a buy is a capital outflow of
    /// `-|quantity * price|` and a sell an inflow of `+|quantity * price|`.
    /// No round-trip matching takes place; callers that need realized trade
    /// PnL should go through `advanced_metrics` with closed `Trade`s.
    ///
    /// Degenerate input never fails: an empty slice returns the zeroed
    /// metrics and every ratio is guarded against a zero denominator.
    #[tracing::instrument(name = "compute_metrics", skip_all, fields(executions = executions.len()))]
    pub fn compute_metrics(&self, executions: &[Execution]) -> PerformanceMetrics {
        let mut metrics = PerformanceMetrics::default();

        if executions.is_empty() {
            tracing::debug!("No executions supplied, returning zeroed metrics.");
            return metrics;
        }

        let pnls: Vec<Decimal> = executions.iter().map(execution_pnl).collect();

        self.calculate_profitability(&pnls, &mut metrics);
        self.calculate_drawdown(&pnls, &mut metrics);
        self.calculate_sharpe(&pnls, &mut metrics);

        tracing::debug!(
            total_return = %metrics.total_return,
            win_rate = %metrics.win_rate,
            max_drawdown = %metrics.max_drawdown,
            "Computed execution metrics."
        );

        metrics
    }

    /// Totals, win/loss counts and the average-trade ratios.
    fn calculate_profitability(&self, pnls: &[Decimal], metrics: &mut PerformanceMetrics) {
        metrics.total_trades = pnls.len();

        let mut gross_profit = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;
        let mut negative_count = 0usize;

        for &pnl in pnls {
            metrics.total_return = metrics.total_return.saturating_add(pnl);

            if pnl > Decimal::ZERO {
                gross_profit = gross_profit.saturating_add(pnl);
                metrics.winning_trades += 1;
            } else if pnl < Decimal::ZERO {
                gross_loss = gross_loss.saturating_add(pnl.abs());
                negative_count += 1;
            }
        }
        // Flat executions are not wins, so they land on the losing side.
        metrics.losing_trades = metrics.total_trades - metrics.winning_trades;

        metrics.win_rate = round_to(
            Decimal::from(metrics.winning_trades) / Decimal::from(metrics.total_trades)
                * Decimal::ONE_HUNDRED,
            WIN_RATE_DECIMALS,
        );

        let average_win = if metrics.winning_trades > 0 {
            gross_profit / Decimal::from(metrics.winning_trades)
        } else {
            Decimal::ZERO
        };
        let average_loss = if negative_count > 0 {
            gross_loss / Decimal::from(negative_count)
        } else {
            Decimal::ZERO
        };

        if average_loss > Decimal::ZERO {
            if let Some(profit_factor) = average_win.checked_div(average_loss) {
                metrics.profit_factor = round_to(profit_factor, PROFIT_FACTOR_DECIMALS);
            }
        }
        metrics.average_win = round_to(average_win, AVERAGE_TRADE_DECIMALS);
        metrics.average_loss = round_to(average_loss, AVERAGE_TRADE_DECIMALS);
    }

    /// Maximum drawdown of the cumulative PnL curve, which starts at zero.
    fn calculate_drawdown(&self, pnls: &[Decimal], metrics: &mut PerformanceMetrics) {
        let mut cumulative = Vec::with_capacity(pnls.len() + 1);
        let mut running = Decimal::ZERO;
        cumulative.push(running);
        for &pnl in pnls {
            running = running.saturating_add(pnl);
            cumulative.push(running);
        }

        let max_drawdown = drawdown_series(&cumulative)
            .into_iter()
            .fold(Decimal::ZERO, Decimal::max);

        metrics.max_drawdown = round_to(max_drawdown, MAX_DRAWDOWN_DECIMALS);
    }

    /// Simplified Sharpe ratio: mean PnL over its population standard
    /// deviation, with no risk-free rate and no annualization.
    ///
    /// The ratio does not depend on scale, so the series is divided by its
    /// largest absolute value first and the squares stay bounded.
    fn calculate_sharpe(&self, pnls: &[Decimal], metrics: &mut PerformanceMetrics) {
        let scale = pnls.iter().map(|p| p.abs()).fold(Decimal::ZERO, Decimal::max);
        if scale.is_zero() {
            return;
        }
        let scaled: Vec<Decimal> = pnls.iter().map(|p| *p / scale).collect();

        let count = Decimal::from(scaled.len());
        let mean = scaled.iter().sum::<Decimal>() / count;
        let variance = scaled
            .iter()
            .map(|p| (*p - mean) * (*p - mean))
            .sum::<Decimal>()
            / count;

        let std_dev = variance.sqrt().unwrap_or(Decimal::ZERO);
        if std_dev.is_zero() {
            return;
        }

        metrics.sharpe_ratio = round_to(mean / std_dev, SHARPE_RATIO_DECIMALS);
    }
}

/// The directional PnL of a single execution.
pub fn execution_pnl(execution: &Execution) -> Decimal {
    match execution.side {
        ExecutionSide::Buy => -execution.notional(),
        ExecutionSide::Sell => execution.notional(),
    }
}

/// Percentage decline of every point from the running peak of `values`.
///
/// The peak includes the current point. Where the peak is zero the drawdown
/// is reported as zero instead of dividing by it. Values too large for a
/// `Decimal` saturate.
pub fn drawdown_series(values: &[Decimal]) -> Vec<Decimal> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let mut peak = first;
    values
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            if peak.is_zero() {
                Decimal::ZERO
            } else {
                peak.saturating_sub(value)
                    .checked_div(peak.abs())
                    .map_or(Decimal::MAX, |ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
            }
        })
        .collect()
}
