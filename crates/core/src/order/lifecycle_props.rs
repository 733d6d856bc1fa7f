//! Property-based tests for the order lifecycle.

use proptest::prelude::*;

use super::lifecycle::{OrderLifecycle, OrderTransition};
use super::types::OrderStatus;

fn arb_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Pending),
        Just(OrderStatus::Delivered),
        Just(OrderStatus::Completed),
        Just(OrderStatus::Cancelled),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Walking any sequence of requested statuses consumes stock at most once.
    #[test]
    fn prop_stock_consumed_at_most_once(
        requests in prop::collection::vec(arb_status(), 0..12),
        quantity in 1i32..100,
    ) {
        let mut status = OrderStatus::Pending;
        let mut consumed = 0;

        for to in requests {
            if let Ok(transition) = OrderLifecycle::transition(status, to, quantity) {
                if let OrderTransition::Complete { consume_bags } = transition {
                    consumed += consume_bags;
                }
                status = transition.new_status();
            }
        }

        prop_assert!(consumed == 0 || consumed == quantity);
        prop_assert_eq!(consumed == quantity, status == OrderStatus::Completed);
    }

    /// Terminal statuses accept no transition.
    #[test]
    fn prop_terminal_statuses_are_final(to in arb_status(), quantity in 1i32..100) {
        for from in [OrderStatus::Completed, OrderStatus::Cancelled] {
            prop_assert!(OrderLifecycle::transition(from, to, quantity).is_err());
        }
    }

    /// Stock check passes exactly when stock covers the request.
    #[test]
    fn prop_check_stock(requested in 0i32..1000, available in 0i32..1000) {
        prop_assert_eq!(
            OrderLifecycle::check_stock(requested, available).is_ok(),
            requested <= available
        );
    }
}
