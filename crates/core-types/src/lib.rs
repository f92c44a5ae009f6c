//! Boundary value objects shared by every analytics crate.
//!
//! Rows coming from the storage layer are converted into these types once,
//! at the edge, so the calculation crates only ever see validated data.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ExecutionSide, TradeSide};
pub use error::CoreError;
pub use structs::{
    equity_curve_from_snapshots, EquityPoint, Execution, RawExecution, RegimeChangeEvent, Trade,
};
