//! Property-based tests for the deduction resolver.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::resolver::DeductionResolver;
use super::types::{AdvanceLine, AdvanceStatus, LoanLine, LoanStatus};

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_loan_status() -> impl Strategy<Value = LoanStatus> {
    prop_oneof![
        Just(LoanStatus::Pending),
        Just(LoanStatus::Approved),
        Just(LoanStatus::Successful),
    ]
}

fn arb_loan() -> impl Strategy<Value = LoanLine> {
    (arb_amount(), arb_loan_status()).prop_map(|(principal_amount, status)| LoanLine {
        principal_amount,
        status,
    })
}

fn arb_advance() -> impl Strategy<Value = AdvanceLine> {
    (
        arb_amount(),
        prop_oneof![Just(AdvanceStatus::Pending), Just(AdvanceStatus::Transferred)],
    )
        .prop_map(|(amount, status)| AdvanceLine { amount, status })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Settling any one loan never increases the loan deduction.
    #[test]
    fn prop_settling_a_loan_never_increases_deduction(
        mut loans in prop::collection::vec(arb_loan(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let before = DeductionResolver::outstanding_loan_amount(&loans);
        let index = pick.index(loans.len());
        loans[index].status = LoanStatus::Successful;
        let after = DeductionResolver::outstanding_loan_amount(&loans);

        prop_assert!(after <= before);
    }

    /// Outstanding loans never exceed the total principal.
    #[test]
    fn prop_outstanding_loans_bounded_by_total(loans in prop::collection::vec(arb_loan(), 0..20)) {
        let total: Decimal = loans.iter().map(|l| l.principal_amount).sum();
        let outstanding = DeductionResolver::outstanding_loan_amount(&loans);
        prop_assert!(outstanding >= Decimal::ZERO);
        prop_assert!(outstanding <= total);
    }

    /// Transferring an advance removes exactly its amount from the deduction.
    #[test]
    fn prop_transferring_an_advance_removes_its_amount(
        mut advances in prop::collection::vec(arb_advance(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(advances.len());
        advances[index].status = AdvanceStatus::Pending;
        let before = DeductionResolver::outstanding_advance_amount(&advances);
        advances[index].status = AdvanceStatus::Transferred;
        let after = DeductionResolver::outstanding_advance_amount(&advances);

        prop_assert_eq!(before - after, advances[index].amount);
    }
}
