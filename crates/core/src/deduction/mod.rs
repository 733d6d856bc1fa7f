//! Loans, advances and product charges deducted from a supplier's income.
//!
//! # Modules
//!
//! - `types` - Loan and advance statuses and the lines the resolver consumes
//! - `loan` - Loan terms validation and repayment schedule
//! - `error` - Deduction input errors
//! - `resolver` - Outstanding amount aggregation

pub mod error;
pub mod loan;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod resolver_props;

pub use error::DeductionError;
pub use loan::{LoanSchedule, LoanTerms, validate_advance_amount, validate_purpose};
pub use resolver::DeductionResolver;
pub use types::{AdvanceLine, AdvanceStatus, LoanLine, LoanStatus};
