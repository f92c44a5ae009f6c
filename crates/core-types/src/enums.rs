use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The direction of a single fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionSide {
    Buy,
    Sell,
}

impl FromStr for ExecutionSide {
    type Err = CoreError;

    /// Parses the side column of a storage row. Matching is case-insensitive
    /// because rows arrive as `BUY`, `Buy` or `buy` depending on the venue.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(ExecutionSide::Buy),
            "sell" => Ok(ExecutionSide::Sell),
            _ => Err(CoreError::UnknownSide {
                kind: "execution",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExecutionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionSide::Buy => write!(f, "buy"),
            ExecutionSide::Sell => write!(f, "sell"),
        }
    }
}

/// The direction of a closed round-trip trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Long,
    Short,
}

impl FromStr for TradeSide {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(TradeSide::Long),
            "short" => Ok(TradeSide::Short),
            _ => Err(CoreError::UnknownSide {
                kind: "trade",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Long => write!(f, "long"),
            TradeSide::Short => write!(f, "short"),
        }
    }
}
