//! Outstanding deduction amounts for a supplier.

use rust_decimal::Decimal;

use super::types::{AdvanceLine, LoanLine};
use crate::order::OrderCharge;

/// Stateless resolver over a supplier's stored loans, advances and orders.
///
/// Every function tolerates an empty slice and returns zero.
pub struct DeductionResolver;

impl DeductionResolver {
    /// Sum of principal over loans that are not yet `Successful`.
    #[must_use]
    pub fn outstanding_loan_amount(loans: &[LoanLine]) -> Decimal {
        loans
            .iter()
            .filter(|loan| loan.status.is_outstanding())
            .map(|loan| loan.principal_amount)
            .sum()
    }

    /// Sum of amounts over advances that are not yet `Transferred`.
    #[must_use]
    pub fn outstanding_advance_amount(advances: &[AdvanceLine]) -> Decimal {
        advances
            .iter()
            .filter(|advance| advance.status.is_outstanding())
            .map(|advance| advance.amount)
            .sum()
    }

    /// Sum of `quantity * rate_at_completion` over completed orders.
    #[must_use]
    pub fn completed_products_amount(orders: &[OrderCharge]) -> Decimal {
        orders.iter().map(OrderCharge::amount).sum()
    }
}
