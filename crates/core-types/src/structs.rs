use crate::enums::{ExecutionSide, TradeSide};
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single fill as recorded by the execution venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub side: ExecutionSide,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
}

impl Execution {
    /// The absolute traded value of the fill, saturating at `Decimal::MAX`.
    pub fn notional(&self) -> Decimal {
        self.quantity.saturating_mul(self.price).abs()
    }
}

/// An execution row as the storage layer hands it over: the side is free-form
/// text and nothing has been checked yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExecution {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub side: String,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub strategy_id: Option<String>,
}

impl TryFrom<RawExecution> for Execution {
    type Error = CoreError;

    fn try_from(raw: RawExecution) -> Result<Self, Self::Error> {
        let side = raw.side.parse::<ExecutionSide>()?;

        if raw.symbol.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                "must not be empty".to_string(),
            ));
        }
        if raw.quantity <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "quantity".to_string(),
                format!("must be positive, got {}", raw.quantity),
            ));
        }
        if raw.price < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "price".to_string(),
                format!("must not be negative, got {}", raw.price),
            ));
        }
        if raw.quantity.checked_mul(raw.price).is_none() {
            return Err(CoreError::InvalidInput(
                "quantity".to_string(),
                format!("notional of {} x {} is out of range", raw.quantity, raw.price),
            ));
        }

        Ok(Execution {
            timestamp: raw.timestamp,
            symbol: raw.symbol,
            side,
            quantity: raw.quantity,
            price: raw.price,
            strategy_id: raw.strategy_id.filter(|s| !s.is_empty()),
        })
    }
}

/// A closed round-trip trade, from entry to exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub quantity: Decimal,
    pub side: TradeSide,
    pub pnl: Decimal,
    pub pnl_pct: Decimal,
    pub duration_days: Decimal,
}

impl Trade {
    /// Builds a closed trade and derives its realized PnL, PnL percentage
    /// (relative to the entry notional) and holding period in days.
    pub fn close(
        side: TradeSide,
        entry_time: DateTime<Utc>,
        exit_time: DateTime<Utc>,
        entry_price: Decimal,
        exit_price: Decimal,
        quantity: Decimal,
    ) -> Self {
        let pnl = match side {
            TradeSide::Long => (exit_price - entry_price) * quantity,
            TradeSide::Short => (entry_price - exit_price) * quantity,
        };
        let entry_notional = (entry_price * quantity).abs();
        let pnl_pct = if entry_notional > Decimal::ZERO {
            pnl / entry_notional * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        let duration_days =
            Decimal::from((exit_time - entry_time).num_seconds()) / Decimal::from(86_400);

        Self {
            entry_time,
            exit_time,
            entry_price,
            exit_price,
            quantity,
            side,
            pnl,
            pnl_pct,
            duration_days,
        }
    }

    pub fn is_win(&self) -> bool {
        self.pnl > Decimal::ZERO
    }
}

/// A snapshot of the portfolio at one point of the equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub date: DateTime<Utc>,
    pub equity: Decimal,
    pub period_return: Decimal,
    pub cumulative_return: Decimal,
    /// Decline from the running peak as a fraction of that peak.
    pub drawdown: Decimal,
    #[serde(default)]
    pub cash: Decimal,
    #[serde(default)]
    pub open_positions: u32,
}

/// Derives a full equity curve from bare `(date, equity)` snapshots.
///
/// Period and cumulative returns are fractions relative to the previous and
/// the first snapshot. Drawdown is measured against the running peak,
/// including the current point. Snapshots must already be in date order.
pub fn equity_curve_from_snapshots(snapshots: &[(DateTime<Utc>, Decimal)]) -> Vec<EquityPoint> {
    let Some(&(_, initial)) = snapshots.first() else {
        return Vec::new();
    };

    let mut curve = Vec::with_capacity(snapshots.len());
    let mut peak = initial;
    let mut previous = initial;

    for &(date, equity) in snapshots {
        peak = peak.max(equity);

        let period_return = ratio_change(previous, equity);
        let cumulative_return = ratio_change(initial, equity);
        let drawdown = if peak > Decimal::ZERO {
            (peak - equity) / peak
        } else {
            Decimal::ZERO
        };

        curve.push(EquityPoint {
            date,
            equity,
            period_return,
            cumulative_return,
            drawdown,
            cash: equity,
            open_positions: 0,
        });
        previous = equity;
    }

    curve
}

fn ratio_change(from: Decimal, to: Decimal) -> Decimal {
    if from.is_zero() {
        Decimal::ZERO
    } else {
        (to - from) / from
    }
}

/// A regime-change record produced by the regime detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeChangeEvent {
    pub regime_id: i64,
    pub regime_name: String,
    /// When the regime actually began, if the detector recorded it.
    #[serde(default)]
    pub regime_start: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_hours: Option<Decimal>,
}

impl RegimeChangeEvent {
    pub fn effective_start(&self) -> DateTime<Utc> {
        self.regime_start.unwrap_or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn raw(side: &str, quantity: Decimal, price: Decimal) -> RawExecution {
        RawExecution {
            timestamp: day(1),
            symbol: "BTCUSDT".to_string(),
            side: side.to_string(),
            quantity,
            price,
            strategy_id: Some(String::new()),
        }
    }

    #[test]
    fn test_raw_execution_converts_with_case_insensitive_side() {
        let execution = Execution::try_from(raw("SELL", dec!(2), dec!(10))).unwrap();
        assert_eq!(execution.side, ExecutionSide::Sell);
        assert_eq!(execution.notional(), dec!(20));
        assert_eq!(execution.strategy_id, None);
    }

    #[test]
    fn test_raw_execution_rejects_bad_rows() {
        assert!(matches!(
            Execution::try_from(raw("hold", dec!(1), dec!(1))),
            Err(CoreError::UnknownSide { .. })
        ));
        assert!(matches!(
            Execution::try_from(raw("buy", dec!(0), dec!(1))),
            Err(CoreError::InvalidInput(field, _)) if field == "quantity"
        ));
        assert!(matches!(
            Execution::try_from(raw("buy", dec!(1), dec!(-1))),
            Err(CoreError::InvalidInput(field, _)) if field == "price"
        ));
    }

    #[test]
    fn test_out_of_range_notional() {
        let huge = dec!(100000000000000000000);
        assert!(matches!(
            Execution::try_from(raw("sell", huge, huge)),
            Err(CoreError::InvalidInput(field, _)) if field == "quantity"
        ));

        let execution = Execution {
            timestamp: day(1),
            symbol: "BTCUSDT".to_string(),
            side: ExecutionSide::Sell,
            quantity: huge,
            price: huge,
            strategy_id: None,
        };
        assert_eq!(execution.notional(), Decimal::MAX);
    }

    #[test]
    fn test_raw_execution_accepts_numeric_strings() {
        let json = r#"{
            "timestamp": "2024-01-01T00:00:00Z",
            "symbol": "ETHUSDT",
            "side": "buy",
            "quantity": "1.5",
            "price": 2000
        }"#;
        let raw: RawExecution = serde_json::from_str(json).unwrap();
        let execution = Execution::try_from(raw).unwrap();
        assert_eq!(execution.quantity, dec!(1.5));
        assert_eq!(execution.price, dec!(2000));
    }

    #[test]
    fn test_trade_close_short_position() {
        let trade = Trade::close(TradeSide::Short, day(1), day(3), dec!(100), dec!(90), dec!(2));
        assert_eq!(trade.pnl, dec!(20));
        assert_eq!(trade.pnl_pct, dec!(10));
        assert_eq!(trade.duration_days, dec!(2));
        assert!(trade.is_win());
    }

    #[test]
    fn test_equity_curve_from_snapshots_tracks_running_peak() {
        let curve = equity_curve_from_snapshots(&[
            (day(1), dec!(100)),
            (day(2), dec!(120)),
            (day(3), dec!(90)),
        ]);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve[0].period_return, Decimal::ZERO);
        assert_eq!(curve[1].period_return, dec!(0.2));
        assert_eq!(curve[2].drawdown, dec!(0.25));
        assert_eq!(curve[2].cumulative_return, dec!(-0.1));
        assert!(equity_curve_from_snapshots(&[]).is_empty());
    }

    #[test]
    fn test_regime_event_prefers_explicit_start() {
        let mut event = RegimeChangeEvent {
            regime_id: 1,
            regime_name: "Bull".to_string(),
            regime_start: Some(day(1)),
            created_at: day(2),
            duration_hours: None,
        };
        assert_eq!(event.effective_start(), day(1));
        event.regime_start = None;
        assert_eq!(event.effective_start(), day(2));
    }
}
