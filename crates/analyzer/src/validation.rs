use crate::result::BacktestResult;
use rust_decimal::Decimal;
use serde::Serialize;

/// Outcome of the structural checks on a `BacktestResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Checks the structural invariants of a result bundle.
///
/// Nothing here fails: every violation becomes one message in the report
/// and the caller decides whether a partially malformed bundle is usable.
pub fn validate(result: &BacktestResult) -> ValidationReport {
    let mut errors = Vec::new();

    if result.id.is_nil() {
        errors.push("Result id is missing".to_string());
    }
    if result.name.trim().is_empty() {
        errors.push("Result name is missing".to_string());
    }
    if result.strategy_id.trim().is_empty() {
        errors.push("Strategy reference is missing".to_string());
    }

    let performance = &result.performance;
    if result.trades.len() != performance.total_trades {
        errors.push(format!(
            "Trade count mismatch: {} trades recorded but performance reports {}",
            result.trades.len(),
            performance.total_trades
        ));
    }
    if performance.winning_trades + performance.losing_trades != performance.total_trades {
        errors.push(format!(
            "Win/loss count mismatch: {} winning + {} losing != {} total",
            performance.winning_trades, performance.losing_trades, performance.total_trades
        ));
    }

    for (i, pair) in result.equity_curve.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            errors.push(format!(
                "Equity curve is not chronological at point {}: {} does not follow {}",
                i + 1,
                pair[1].date,
                pair[0].date
            ));
        }
    }

    for (i, trade) in result.trades.iter().enumerate() {
        if trade.entry_time >= trade.exit_time {
            errors.push(format!(
                "Trade {} exits at {} which is not after its entry at {}",
                i, trade.exit_time, trade.entry_time
            ));
        }
        if trade.quantity <= Decimal::ZERO {
            errors.push(format!("Trade {} has non-positive quantity {}", i, trade.quantity));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::BacktestPerformance;
    use chrono::{DateTime, TimeZone, Utc};
    use core_types::{equity_curve_from_snapshots, Trade, TradeSide};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, d, 0, 0, 0).unwrap()
    }

    fn valid_result() -> BacktestResult {
        let trades = vec![
            Trade::close(TradeSide::Long, day(1), day(2), dec!(100), dec!(110), dec!(1)),
            Trade::close(TradeSide::Short, day(3), day(4), dec!(110), dec!(115), dec!(1)),
        ];
        BacktestResult {
            id: Uuid::new_v4(),
            name: "ma-crossover 10/50".to_string(),
            strategy_id: "ma_crossover".to_string(),
            symbol: "BTCUSDT".to_string(),
            performance: BacktestPerformance {
                total_return_pct: dec!(5),
                sharpe_ratio: dec!(1.2),
                max_drawdown_pct: dec!(4.35),
                win_rate: dec!(50),
                profit_factor: dec!(2),
                total_trades: 2,
                winning_trades: 1,
                losing_trades: 1,
            },
            equity_curve: equity_curve_from_snapshots(&[
                (day(1), dec!(1000)),
                (day(2), dec!(1010)),
                (day(4), dec!(1005)),
            ]),
            trades,
        }
    }

    #[test]
    fn test_valid_result_passes() {
        let report = validate(&valid_result());
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_identifiers_are_reported() {
        let mut result = valid_result();
        result.id = Uuid::nil();
        result.name = "  ".to_string();
        result.strategy_id.clear();

        let report = validate(&result);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_count_mismatches_are_reported() {
        let mut result = valid_result();
        result.performance.total_trades = 3;

        let report = validate(&result);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("Trade count mismatch"));
        assert!(report.errors[1].starts_with("Win/loss count mismatch"));
    }

    #[test]
    fn test_non_chronological_curve_is_reported() {
        let mut result = valid_result();
        result.equity_curve[2].date = day(2);

        let report = validate(&result);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("point 2"));
    }

    #[test]
    fn test_bad_trades_are_reported_individually() {
        let mut result = valid_result();
        result.trades[0].exit_time = result.trades[0].entry_time;
        result.trades[1].quantity = Decimal::ZERO;

        let report = validate(&result);
        assert_eq!(
            report.errors,
            vec![
                format!(
                    "Trade 0 exits at {} which is not after its entry at {}",
                    day(1),
                    day(1)
                ),
                "Trade 1 has non-positive quantity 0".to_string(),
            ]
        );
    }

    #[test]
    fn test_result_bundle_reads_camel_case_json() {
        let json = r#"{
            "id": "5b1f3c1e-9a52-4a0e-8f3d-0c9f0f3c2b11",
            "name": "breakout",
            "strategyId": "super_trend",
            "performance": {
                "totalReturnPct": "12.5",
                "sharpeRatio": 1.4,
                "maxDrawdownPct": 6,
                "winRate": 55,
                "totalTrades": 0,
                "winningTrades": 0,
                "losingTrades": 0
            }
        }"#;
        let result: BacktestResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.performance.total_return_pct, dec!(12.5));
        assert!(result.equity_curve.is_empty());
        assert!(validate(&result).valid);
    }
}
