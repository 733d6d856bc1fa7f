//! Property-based tests for the settlement engine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::{SettlementEngine, SettlementInputs, StatusChange};
use super::types::{SettlementOverrides, SettlementPolicy, SettlementStatus};
use crate::collection::CollectionLine;
use crate::deduction::{AdvanceLine, AdvanceStatus, LoanLine, LoanStatus};
use crate::order::{OrderCharge, OrderStatus};

fn arb_money() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_collection() -> impl Strategy<Value = CollectionLine> {
    ((0i64..200_000).prop_map(|g| Decimal::new(g, 3)), arb_money()).prop_map(
        |(net_weight_kg, rate_at_collection)| CollectionLine {
            net_weight_kg,
            rate_at_collection,
        },
    )
}

fn arb_loan() -> impl Strategy<Value = LoanLine> {
    (
        arb_money(),
        prop_oneof![
            Just(LoanStatus::Pending),
            Just(LoanStatus::Approved),
            Just(LoanStatus::Successful),
        ],
    )
        .prop_map(|(principal_amount, status)| LoanLine {
            principal_amount,
            status,
        })
}

fn arb_advance() -> impl Strategy<Value = AdvanceLine> {
    (
        arb_money(),
        prop_oneof![Just(AdvanceStatus::Pending), Just(AdvanceStatus::Transferred)],
    )
        .prop_map(|(amount, status)| AdvanceLine { amount, status })
}

fn arb_order() -> impl Strategy<Value = OrderCharge> {
    (1i32..50, arb_money(), any::<bool>()).prop_map(|(quantity, rate, completed)| {
        if completed {
            OrderCharge {
                quantity,
                status: OrderStatus::Completed,
                rate_at_completion: Some(rate),
            }
        } else {
            OrderCharge {
                quantity,
                status: OrderStatus::Pending,
                rate_at_completion: None,
            }
        }
    })
}

fn arb_status() -> impl Strategy<Value = SettlementStatus> {
    prop_oneof![
        Just(SettlementStatus::Pending),
        Just(SettlementStatus::Processing),
        Just(SettlementStatus::Transferred),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Computing twice over unchanged records yields identical results,
    /// and the final total always equals income minus every deduction.
    #[test]
    fn prop_compute_is_idempotent_and_balanced(
        collections in prop::collection::vec(arb_collection(), 0..10),
        loans in prop::collection::vec(arb_loan(), 0..10),
        advances in prop::collection::vec(arb_advance(), 0..10),
        orders in prop::collection::vec(arb_order(), 0..10),
        charge in arb_money(),
    ) {
        let inputs = SettlementInputs {
            collections: &collections,
            loans: &loans,
            advances: &advances,
            orders: &orders,
        };
        let policy = SettlementPolicy { transport_charge: charge };

        let first = SettlementEngine::compute(&inputs, &policy);
        let second = SettlementEngine::compute(&inputs, &policy);

        prop_assert_eq!(first, second);
        prop_assert_eq!(first.final_total, first.gross_income - first.total_deductions());
    }

    /// Empty overrides leave a computed breakdown untouched.
    #[test]
    fn prop_empty_overrides_are_identity(
        collections in prop::collection::vec(arb_collection(), 0..10),
        loans in prop::collection::vec(arb_loan(), 0..10),
    ) {
        let inputs = SettlementInputs {
            collections: &collections,
            loans: &loans,
            ..SettlementInputs::default()
        };
        let computed = SettlementEngine::compute(&inputs, &SettlementPolicy::default());
        let applied = SettlementEngine::apply_overrides(&computed, &SettlementOverrides::default());

        prop_assert_eq!(applied, Ok(computed));
    }

    /// Accepted transitions never move a settlement backwards.
    #[test]
    fn prop_transitions_only_move_forward(from in arb_status(), to in arb_status()) {
        match SettlementEngine::transition(from, to) {
            Ok(StatusChange::Unchanged) => prop_assert_eq!(from, to),
            Ok(StatusChange::Changed(next)) => prop_assert!(next > from),
            Err(_) => prop_assert!(to < from),
        }
    }
}
