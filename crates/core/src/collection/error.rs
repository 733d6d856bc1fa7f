//! Collection error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when a leaf weighing is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A weight or the rate is negative.
    #[error("{field} cannot be negative")]
    NegativeValue {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Gross weight is zero, so there is nothing to record.
    #[error("gross weight must be greater than zero")]
    EmptyDelivery,

    /// Water and bag deductions exceed the gross weight.
    #[error("water ({water_kg} kg) and bag ({bag_kg} kg) deductions exceed gross weight {gross_kg} kg")]
    DeductionsExceedGross {
        /// Gross weight.
        gross_kg: Decimal,
        /// Water deduction.
        water_kg: Decimal,
        /// Bag deduction.
        bag_kg: Decimal,
    },
}
