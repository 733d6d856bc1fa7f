//! Settlement error types.

use thiserror::Error;

use super::types::SettlementStatus;

/// Errors that can occur while composing or updating a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Status string outside the closed vocabulary.
    #[error("Unknown settlement status: {0}")]
    UnknownStatus(String),

    /// Attempted to move a settlement backwards or out of a terminal status.
    #[error("Invalid settlement status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: SettlementStatus,
        /// Requested status.
        to: SettlementStatus,
    },

    /// An override amount was negative.
    #[error("Override for {field} cannot be negative")]
    NegativeOverride {
        /// Name of the overridden component.
        field: &'static str,
    },

    /// Configured transport charge is negative.
    #[error("Transport charge cannot be negative")]
    NegativeTransportCharge,
}
