use analytics::BacktestPerformance;
use core_types::{EquityPoint, Trade};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A complete backtest run as returned by the backtest service: the
/// performance summary together with the curve and trades it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    pub id: Uuid,
    pub name: String,
    pub strategy_id: String,
    #[serde(default)]
    pub symbol: String,
    pub performance: BacktestPerformance,
    #[serde(default)]
    pub equity_curve: Vec<EquityPoint>,
    #[serde(default)]
    pub trades: Vec<Trade>,
}
