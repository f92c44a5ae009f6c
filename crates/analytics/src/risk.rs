use crate::engine::AnalyticsEngine;
use crate::report::{AdvancedMetrics, BacktestPerformance, MonthlyReturn};
use core_types::{EquityPoint, Trade};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

impl AnalyticsEngine {
    /// Derives the secondary risk measures of a single backtest run.
    ///
    /// `base` supplies the run-level return and drawdown percentages for the
    /// recovery factor. The equity curve is expected in date order (see the
    /// result validator); trades are scanned in the order given.
    #[tracing::instrument(
        name = "advanced_metrics",
        skip_all,
        fields(points = equity_curve.len(), trades = trades.len())
    )]
    pub fn advanced_metrics(
        &self,
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        base: &BacktestPerformance,
    ) -> AdvancedMetrics {
        let monthly_returns = monthly_returns(equity_curve);
        let (average_monthly_return, best_month, worst_month) = summarize_months(&monthly_returns);
        let (max_consecutive_wins, max_consecutive_losses) = streaks(trades);

        AdvancedMetrics {
            ulcer_index: ulcer_index(equity_curve),
            gain_to_pain_ratio: gain_to_pain_ratio(equity_curve),
            recovery_factor: recovery_factor(base),
            monthly_returns,
            average_monthly_return,
            best_month,
            worst_month,
            max_consecutive_wins,
            max_consecutive_losses,
            probability_of_success: probability_of_success(trades),
        }
    }
}

/// Root mean square of the per-point drawdowns, in percent points.
pub fn ulcer_index(equity_curve: &[EquityPoint]) -> Decimal {
    if equity_curve.len() < 2 {
        return Decimal::ZERO;
    }

    let sum_of_squares: Decimal = equity_curve
        .iter()
        .map(|point| {
            let pct = point.drawdown * Decimal::ONE_HUNDRED;
            pct * pct
        })
        .sum();

    (sum_of_squares / Decimal::from(equity_curve.len()))
        .sqrt()
        .unwrap_or(Decimal::ZERO)
}

/// Sum of positive period returns over the absolute sum of negative ones.
pub fn gain_to_pain_ratio(equity_curve: &[EquityPoint]) -> Decimal {
    let (gains, pains) = equity_curve.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(gains, pains), point| match point.period_return {
            r if r > Decimal::ZERO => (gains + r, pains),
            r if r < Decimal::ZERO => (gains, pains + r.abs()),
            _ => (gains, pains),
        },
    );

    if pains.is_zero() {
        Decimal::ZERO
    } else {
        gains / pains
    }
}

pub fn recovery_factor(base: &BacktestPerformance) -> Decimal {
    if base.max_drawdown_pct <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    base.total_return_pct / base.max_drawdown_pct
}

/// Buckets the curve by calendar month and measures each month from its
/// first to its last equity value. The trailing month may be partial.
pub fn monthly_returns(equity_curve: &[EquityPoint]) -> Vec<MonthlyReturn> {
    let mut months = Vec::new();
    let Some(first) = equity_curve.first() else {
        return months;
    };

    let mut current_month = month_key(first);
    let mut month_open = first.equity;
    let mut last_equity = first.equity;

    for point in &equity_curve[1..] {
        let key = month_key(point);
        if key != current_month {
            months.push(MonthlyReturn {
                month: std::mem::replace(&mut current_month, key),
                return_pct: percent_change(month_open, last_equity),
            });
            month_open = point.equity;
        }
        last_equity = point.equity;
    }

    months.push(MonthlyReturn {
        month: current_month,
        return_pct: percent_change(month_open, last_equity),
    });

    tracing::debug!(months = months.len(), "Bucketed equity curve by month.");
    months
}

/// Average, best and worst monthly return; all zero when there are none.
fn summarize_months(months: &[MonthlyReturn]) -> (Decimal, Decimal, Decimal) {
    if months.is_empty() {
        return (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    }

    let returns = months.iter().map(|m| m.return_pct);
    let total: Decimal = returns.clone().sum();
    let best = returns.clone().fold(Decimal::MIN, Decimal::max);
    let worst = returns.fold(Decimal::MAX, Decimal::min);

    (total / Decimal::from(months.len()), best, worst)
}

/// Longest runs of winning and losing trades. Only a strictly positive PnL
/// is a win; a flat trade breaks a winning streak.
pub fn streaks(trades: &[Trade]) -> (usize, usize) {
    let mut current_wins = 0usize;
    let mut current_losses = 0usize;
    let mut max_wins = 0usize;
    let mut max_losses = 0usize;

    for trade in trades {
        if trade.is_win() {
            current_wins += 1;
            current_losses = 0;
            max_wins = max_wins.max(current_wins);
        } else {
            current_losses += 1;
            current_wins = 0;
            max_losses = max_losses.max(current_losses);
        }
    }

    (max_wins, max_losses)
}

pub fn probability_of_success(trades: &[Trade]) -> Decimal {
    if trades.is_empty() {
        return Decimal::ZERO;
    }
    let wins = trades.iter().filter(|t| t.is_win()).count();
    Decimal::from(wins) / Decimal::from(trades.len()) * Decimal::ONE_HUNDRED
}

fn month_key(point: &EquityPoint) -> String {
    point.date.format("%Y-%m").to_string()
}

fn percent_change(from: Decimal, to: Decimal) -> Decimal {
    if from.is_zero() {
        return Decimal::ZERO;
    }
    (to - from) / from * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use core_types::{equity_curve_from_snapshots, TradeSide};
    use rust_decimal_macros::dec;

    fn date(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
    }

    fn trade_with_pnl(pnl: Decimal) -> Trade {
        let mut trade = Trade::close(
            TradeSide::Long,
            date(1, 1),
            date(1, 2),
            dec!(100),
            dec!(100),
            dec!(1),
        );
        trade.pnl = pnl;
        trade
    }

    fn base(total_return_pct: Decimal, max_drawdown_pct: Decimal) -> BacktestPerformance {
        BacktestPerformance {
            total_return_pct,
            max_drawdown_pct,
            ..Default::default()
        }
    }

    #[test]
    fn test_ulcer_index_of_single_point_is_zero() {
        let curve = equity_curve_from_snapshots(&[(date(1, 1), dec!(100))]);
        assert_eq!(ulcer_index(&curve), Decimal::ZERO);
        assert_eq!(ulcer_index(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_ulcer_index_is_rms_of_drawdown_percent() {
        // Drawdowns: 0%, 0%, 25%, 0% -> sqrt(625 / 4) = 12.5
        let curve = equity_curve_from_snapshots(&[
            (date(1, 1), dec!(100)),
            (date(1, 2), dec!(120)),
            (date(1, 3), dec!(90)),
            (date(1, 4), dec!(130)),
        ]);
        assert_eq!(ulcer_index(&curve).round_dp(6), dec!(12.5));
    }

    #[test]
    fn test_gain_to_pain_ratio() {
        let curve = equity_curve_from_snapshots(&[
            (date(1, 1), dec!(100)),
            (date(1, 2), dec!(110)),
            (date(1, 3), dec!(99)),
        ]);
        // Gains 0.10, pains 0.10
        assert_eq!(gain_to_pain_ratio(&curve), dec!(1));

        let rising = equity_curve_from_snapshots(&[(date(1, 1), dec!(100)), (date(1, 2), dec!(110))]);
        assert_eq!(gain_to_pain_ratio(&rising), Decimal::ZERO);
    }

    #[test]
    fn test_recovery_factor_guards_zero_drawdown() {
        assert_eq!(recovery_factor(&base(dec!(30), dec!(10))), dec!(3));
        assert_eq!(recovery_factor(&base(dec!(30), Decimal::ZERO)), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_returns_close_each_month_on_its_last_point() {
        let curve = equity_curve_from_snapshots(&[
            (date(1, 1), dec!(100)),
            (date(1, 31), dec!(110)),
            (date(2, 1), dec!(120)),
            (date(2, 15), dec!(108)),
            (date(3, 3), dec!(100)),
        ]);
        let months = monthly_returns(&curve);

        assert_eq!(months.len(), 3);
        assert_eq!(months[0].month, "2024-01");
        assert_eq!(months[0].return_pct, dec!(10));
        assert_eq!(months[1].month, "2024-02");
        assert_eq!(months[1].return_pct, dec!(-10));
        // A single-point trailing month has no change.
        assert_eq!(months[2].month, "2024-03");
        assert_eq!(months[2].return_pct, Decimal::ZERO);

        let (average, best, worst) = summarize_months(&months);
        assert_eq!(average, Decimal::ZERO);
        assert_eq!(best, dec!(10));
        assert_eq!(worst, dec!(-10));
    }

    #[test]
    fn test_streaks_treat_flat_trades_as_losses() {
        let trades: Vec<Trade> = [dec!(5), dec!(3), dec!(0), dec!(-2), dec!(-1), dec!(4)]
            .into_iter()
            .map(trade_with_pnl)
            .collect();
        assert_eq!(streaks(&trades), (2, 3));
        assert_eq!(streaks(&[]), (0, 0));
    }

    #[test]
    fn test_advanced_metrics_on_empty_inputs_are_neutral() {
        let metrics = AnalyticsEngine::new().advanced_metrics(&[], &[], &BacktestPerformance::default());
        assert_eq!(metrics, AdvancedMetrics::default());
    }

    #[test]
    fn test_advanced_metrics_combines_all_measures() {
        let curve = equity_curve_from_snapshots(&[
            (date(1, 1), dec!(1000)),
            (date(1, 20), dec!(1100)),
            (date(2, 3), dec!(1045)),
        ]);
        let trades: Vec<Trade> = [dec!(100), dec!(-55)].into_iter().map(trade_with_pnl).collect();

        let metrics =
            AnalyticsEngine::new().advanced_metrics(&curve, &trades, &base(dec!(4.5), dec!(5)));

        assert_eq!(metrics.recovery_factor, dec!(0.9));
        assert_eq!(metrics.probability_of_success, dec!(50));
        assert_eq!(metrics.max_consecutive_wins, 1);
        assert_eq!(metrics.max_consecutive_losses, 1);
        assert_eq!(metrics.monthly_returns.len(), 2);
        assert_eq!(metrics.best_month, dec!(10));
        assert_eq!(metrics.worst_month, Decimal::ZERO);
        assert_eq!(metrics.gain_to_pain_ratio, dec!(2));
    }
}
