//! Output precision of the execution-level metrics.
//!
//! Downstream golden-output tests depend on these exact precisions.

use rust_decimal::{Decimal, RoundingStrategy};

pub const SHARPE_RATIO_DECIMALS: u32 = 3;
pub const MAX_DRAWDOWN_DECIMALS: u32 = 2;
pub const PROFIT_FACTOR_DECIMALS: u32 = 2;
pub const AVERAGE_TRADE_DECIMALS: u32 = 2;
pub const WIN_RATE_DECIMALS: u32 = 1;

/// Rounds half away from zero, so `1.005` becomes `1.01` at two places.
pub fn round_to(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}
