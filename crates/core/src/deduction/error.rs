//! Deduction error types.

use thiserror::Error;

/// Errors raised when a loan or advance request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeductionError {
    /// Loan principal is zero or negative.
    #[error("loan amount must be greater than zero")]
    NonPositivePrincipal,

    /// Loan duration is negative.
    #[error("loan duration cannot be negative")]
    NegativeDuration,

    /// Loan duration pushes the due date past the calendar range.
    #[error("loan duration of {0} months is out of range")]
    DurationOutOfRange(i32),

    /// Advance amount is zero or negative.
    #[error("advance amount must be greater than zero")]
    NonPositiveAdvance,

    /// Loan purpose is blank.
    #[error("loan purpose is required")]
    MissingPurpose,
}
