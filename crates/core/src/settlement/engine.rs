//! Settlement composition and status lifecycle.

use rust_decimal::Decimal;

use super::error::SettlementError;
use super::types::{SettlementBreakdown, SettlementOverrides, SettlementPolicy, SettlementStatus};
use crate::collection::{CollectionAggregator, CollectionLine};
use crate::deduction::{AdvanceLine, DeductionResolver, LoanLine};
use crate::order::OrderCharge;

/// A supplier's stored records, as loaded by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementInputs<'a> {
    /// Leaf collections.
    pub collections: &'a [CollectionLine],
    /// Loans in any status.
    pub loans: &'a [LoanLine],
    /// Advances in any status.
    pub advances: &'a [AdvanceLine],
    /// Product orders in any status.
    pub orders: &'a [OrderCharge],
}

/// Result of a validated status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Requested status equals the current one; nothing to write.
    Unchanged,
    /// Status moves forward.
    Changed(SettlementStatus),
}

/// Stateless settlement engine.
pub struct SettlementEngine;

impl SettlementEngine {
    /// Computes the settlement for the given records.
    ///
    /// Pure: identical inputs always give identical output.
    #[must_use]
    pub fn compute(
        inputs: &SettlementInputs<'_>,
        policy: &SettlementPolicy,
    ) -> SettlementBreakdown {
        SettlementBreakdown::from_components(
            CollectionAggregator::gross_income(inputs.collections),
            DeductionResolver::outstanding_loan_amount(inputs.loans),
            DeductionResolver::outstanding_advance_amount(inputs.advances),
            DeductionResolver::completed_products_amount(inputs.orders),
            policy.transport_charge,
        )
    }

    /// Replaces computed components with caller overrides and re-derives
    /// the final total.
    pub fn apply_overrides(
        computed: &SettlementBreakdown,
        overrides: &SettlementOverrides,
    ) -> Result<SettlementBreakdown, SettlementError> {
        let pick = |field: &'static str, value: Option<Decimal>, fallback: Decimal| match value {
            Some(v) if v < Decimal::ZERO => Err(SettlementError::NegativeOverride { field }),
            Some(v) => Ok(v),
            None => Ok(fallback),
        };

        Ok(SettlementBreakdown::from_components(
            pick("gross_income", overrides.gross_income, computed.gross_income)?,
            pick("loan_amount", overrides.loan_amount, computed.loan_amount)?,
            pick("advance_amount", overrides.advance_amount, computed.advance_amount)?,
            pick("products_amount", overrides.products_amount, computed.products_amount)?,
            pick(
                "transport_charge",
                overrides.transport_charge,
                computed.transport_charge,
            )?,
        ))
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Processing
    /// - Pending → Transferred
    /// - Processing → Transferred
    #[must_use]
    pub fn is_valid_transition(from: SettlementStatus, to: SettlementStatus) -> bool {
        matches!(
            (from, to),
            (
                SettlementStatus::Pending,
                SettlementStatus::Processing | SettlementStatus::Transferred
            ) | (SettlementStatus::Processing, SettlementStatus::Transferred)
        )
    }

    /// Validates a status update. Re-setting the current status is a no-op.
    pub fn transition(
        from: SettlementStatus,
        to: SettlementStatus,
    ) -> Result<StatusChange, SettlementError> {
        if from == to {
            return Ok(StatusChange::Unchanged);
        }
        if Self::is_valid_transition(from, to) {
            Ok(StatusChange::Changed(to))
        } else {
            Err(SettlementError::InvalidTransition { from, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::LeafWeighing;
    use crate::deduction::{AdvanceStatus, LoanStatus};
    use crate::order::OrderStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compute_nets_out_every_deduction() {
        let collections = [CollectionLine {
            net_weight_kg: dec!(100),
            rate_at_collection: dec!(50),
        }];
        let loans = [
            LoanLine {
                principal_amount: dec!(600),
                status: LoanStatus::Pending,
            },
            LoanLine {
                principal_amount: dec!(400),
                status: LoanStatus::Approved,
            },
        ];
        let advances = [AdvanceLine {
            amount: dec!(500),
            status: AdvanceStatus::Pending,
        }];
        let orders = [OrderCharge {
            quantity: 16,
            status: OrderStatus::Completed,
            rate_at_completion: Some(dec!(50)),
        }];
        let inputs = SettlementInputs {
            collections: &collections,
            loans: &loans,
            advances: &advances,
            orders: &orders,
        };

        let breakdown = SettlementEngine::compute(&inputs, &SettlementPolicy::default());

        assert_eq!(breakdown.gross_income, dec!(5000));
        assert_eq!(breakdown.loan_amount, dec!(1000));
        assert_eq!(breakdown.advance_amount, dec!(500));
        assert_eq!(breakdown.products_amount, dec!(800));
        assert_eq!(breakdown.transport_charge, dec!(100));
        assert_eq!(breakdown.final_total, dec!(2600));
    }

    #[test]
    fn test_single_delivery_supplier_scenario() {
        let weighing = LeafWeighing {
            gross_weight_kg: dec!(25),
            water_weight_kg: dec!(3),
            bag_weight_kg: dec!(2),
            rate_at_collection: dec!(50),
        };
        let collections = [weighing.to_line()];
        let loans = [LoanLine {
            principal_amount: dec!(300),
            status: LoanStatus::Pending,
        }];
        let advances = [AdvanceLine {
            amount: dec!(200),
            status: AdvanceStatus::Transferred,
        }];
        let inputs = SettlementInputs {
            collections: &collections,
            loans: &loans,
            advances: &advances,
            orders: &[],
        };

        let breakdown = SettlementEngine::compute(&inputs, &SettlementPolicy::default());

        assert_eq!(breakdown.gross_income, dec!(1000));
        assert_eq!(breakdown.loan_amount, dec!(300));
        assert_eq!(breakdown.advance_amount, Decimal::ZERO);
        assert_eq!(breakdown.products_amount, Decimal::ZERO);
        assert_eq!(breakdown.transport_charge, dec!(100));
        assert_eq!(breakdown.final_total, dec!(600));
    }

    #[test]
    fn test_supplier_without_records_owes_transport() {
        let breakdown =
            SettlementEngine::compute(&SettlementInputs::default(), &SettlementPolicy::default());
        assert_eq!(breakdown.gross_income, Decimal::ZERO);
        assert_eq!(breakdown.final_total, dec!(-100));
    }

    #[test]
    fn test_overrides_rederive_final_total() {
        let computed = SettlementBreakdown::from_components(
            dec!(1000),
            dec!(300),
            Decimal::ZERO,
            Decimal::ZERO,
            dec!(100),
        );
        let overrides = SettlementOverrides {
            loan_amount: Some(dec!(100)),
            transport_charge: Some(Decimal::ZERO),
            ..SettlementOverrides::default()
        };

        let applied = SettlementEngine::apply_overrides(&computed, &overrides).unwrap();

        assert_eq!(applied.gross_income, dec!(1000));
        assert_eq!(applied.loan_amount, dec!(100));
        assert_eq!(applied.transport_charge, Decimal::ZERO);
        assert_eq!(applied.final_total, dec!(900));
    }

    #[test]
    fn test_negative_override_is_rejected() {
        let computed = SettlementBreakdown::from_components(
            dec!(1000),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            dec!(100),
        );
        let overrides = SettlementOverrides {
            advance_amount: Some(dec!(-5)),
            ..SettlementOverrides::default()
        };

        assert_eq!(
            SettlementEngine::apply_overrides(&computed, &overrides),
            Err(SettlementError::NegativeOverride {
                field: "advance_amount"
            })
        );
    }

    #[test]
    fn test_forward_transitions() {
        assert_eq!(
            SettlementEngine::transition(SettlementStatus::Pending, SettlementStatus::Processing),
            Ok(StatusChange::Changed(SettlementStatus::Processing))
        );
        assert_eq!(
            SettlementEngine::transition(
                SettlementStatus::Processing,
                SettlementStatus::Transferred
            ),
            Ok(StatusChange::Changed(SettlementStatus::Transferred))
        );
        assert_eq!(
            SettlementEngine::transition(SettlementStatus::Pending, SettlementStatus::Transferred),
            Ok(StatusChange::Changed(SettlementStatus::Transferred))
        );
    }

    #[test]
    fn test_same_status_is_noop() {
        assert_eq!(
            SettlementEngine::transition(
                SettlementStatus::Transferred,
                SettlementStatus::Transferred
            ),
            Ok(StatusChange::Unchanged)
        );
    }

    #[test]
    fn test_backward_transition_is_rejected() {
        assert_eq!(
            SettlementEngine::transition(SettlementStatus::Transferred, SettlementStatus::Pending),
            Err(SettlementError::InvalidTransition {
                from: SettlementStatus::Transferred,
                to: SettlementStatus::Pending,
            })
        );
        assert!(
            SettlementEngine::transition(SettlementStatus::Processing, SettlementStatus::Pending)
                .is_err()
        );
    }
}
