//! Supplier payment settlement.
//!
//! Combines the collection aggregator and the deduction resolver with a
//! flat transport charge into a final payable figure, and governs the
//! status lifecycle of a persisted settlement.
//!
//! # Modules
//!
//! - `types` - Breakdown, overrides, policy and status
//! - `engine` - Composition and status transitions
//! - `error` - Settlement errors

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{SettlementEngine, SettlementInputs, StatusChange};
pub use error::SettlementError;
pub use types::{
    DEFAULT_TRANSPORT_CHARGE, SettlementBreakdown, SettlementOverrides, SettlementPolicy,
    SettlementStatus,
};
