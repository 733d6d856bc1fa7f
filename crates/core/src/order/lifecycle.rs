//! Order lifecycle state machine.
//!
//! Stock handling is decided here; the repository performs the atomic
//! conditional decrement the returned transition asks for.

use rust_decimal::Decimal;

use super::error::OrderError;
use super::types::OrderStatus;

/// Outcome of a validated status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTransition {
    /// Status changes without touching stock.
    StatusOnly {
        /// Target status.
        new_status: OrderStatus,
    },
    /// Status changes to `Completed`: stock must be decremented by the
    /// order quantity and the current product rate snapshotted.
    Complete {
        /// Bags to take out of stock.
        consume_bags: i32,
    },
}

impl OrderTransition {
    /// Status the order ends up in.
    #[must_use]
    pub const fn new_status(&self) -> OrderStatus {
        match self {
            Self::StatusOnly { new_status } => *new_status,
            Self::Complete { .. } => OrderStatus::Completed,
        }
    }
}

/// Stateless service for order status changes.
pub struct OrderLifecycle;

impl OrderLifecycle {
    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Delivered
    /// - Pending → Completed, Delivered → Completed
    /// - Pending → Cancelled, Delivered → Cancelled
    #[must_use]
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (
                OrderStatus::Pending,
                OrderStatus::Delivered | OrderStatus::Completed | OrderStatus::Cancelled
            ) | (
                OrderStatus::Delivered,
                OrderStatus::Completed | OrderStatus::Cancelled
            )
        )
    }

    /// Validates a transition for an order of `quantity` bags.
    ///
    /// A second move into `Completed` is rejected, so stock can only ever be
    /// consumed once per order.
    pub fn transition(
        from: OrderStatus,
        to: OrderStatus,
        quantity: i32,
    ) -> Result<OrderTransition, OrderError> {
        if !Self::is_valid_transition(from, to) {
            return Err(OrderError::InvalidTransition { from, to });
        }
        Self::validate_quantity(quantity)?;

        Ok(match to {
            OrderStatus::Completed => OrderTransition::Complete {
                consume_bags: quantity,
            },
            new_status => OrderTransition::StatusOnly { new_status },
        })
    }

    /// Initial status for a new order. Orders may be placed as `Pending`
    /// or directly `Completed` (over-the-counter sales).
    pub fn initial(status: OrderStatus, quantity: i32) -> Result<OrderTransition, OrderError> {
        Self::validate_quantity(quantity)?;
        match status {
            OrderStatus::Pending => Ok(OrderTransition::StatusOnly {
                new_status: OrderStatus::Pending,
            }),
            OrderStatus::Completed => Ok(OrderTransition::Complete {
                consume_bags: quantity,
            }),
            other => Err(OrderError::InvalidTransition {
                from: OrderStatus::Pending,
                to: other,
            }),
        }
    }

    /// Quantity must be at least one bag.
    pub const fn validate_quantity(quantity: i32) -> Result<(), OrderError> {
        if quantity <= 0 {
            return Err(OrderError::NonPositiveQuantity);
        }
        Ok(())
    }

    /// Checks that `available` bags cover `requested`.
    pub const fn check_stock(requested: i32, available: i32) -> Result<(), OrderError> {
        if requested > available {
            return Err(OrderError::InsufficientStock {
                requested,
                available,
            });
        }
        Ok(())
    }

    /// Orders that consumed stock or are on their way stay on record.
    pub const fn check_deletable(status: OrderStatus) -> Result<(), OrderError> {
        match status {
            OrderStatus::Pending | OrderStatus::Cancelled => Ok(()),
            other => Err(OrderError::NotDeletable(other)),
        }
    }

    /// Validates product catalogue values.
    pub fn validate_product(rate_per_bag: Decimal, stock_bags: i32) -> Result<(), OrderError> {
        if rate_per_bag < Decimal::ZERO {
            return Err(OrderError::NegativeRate(rate_per_bag));
        }
        if stock_bags < 0 {
            return Err(OrderError::NegativeStock(stock_bags));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(OrderStatus::Pending, OrderStatus::Delivered, true)]
    #[case(OrderStatus::Pending, OrderStatus::Completed, true)]
    #[case(OrderStatus::Pending, OrderStatus::Cancelled, true)]
    #[case(OrderStatus::Delivered, OrderStatus::Completed, true)]
    #[case(OrderStatus::Delivered, OrderStatus::Cancelled, true)]
    #[case(OrderStatus::Delivered, OrderStatus::Pending, false)]
    #[case(OrderStatus::Completed, OrderStatus::Completed, false)]
    #[case(OrderStatus::Completed, OrderStatus::Cancelled, false)]
    #[case(OrderStatus::Cancelled, OrderStatus::Pending, false)]
    #[case(OrderStatus::Pending, OrderStatus::Pending, false)]
    fn test_is_valid_transition(
        #[case] from: OrderStatus,
        #[case] to: OrderStatus,
        #[case] expected: bool,
    ) {
        assert_eq!(OrderLifecycle::is_valid_transition(from, to), expected);
    }

    #[test]
    fn test_completion_consumes_stock() {
        let transition =
            OrderLifecycle::transition(OrderStatus::Pending, OrderStatus::Completed, 10).unwrap();
        assert_eq!(transition, OrderTransition::Complete { consume_bags: 10 });
        assert_eq!(transition.new_status(), OrderStatus::Completed);
    }

    #[test]
    fn test_delivery_does_not_consume_stock() {
        let transition =
            OrderLifecycle::transition(OrderStatus::Pending, OrderStatus::Delivered, 10).unwrap();
        assert_eq!(
            transition,
            OrderTransition::StatusOnly {
                new_status: OrderStatus::Delivered
            }
        );
    }

    #[test]
    fn test_second_completion_is_rejected() {
        let err = OrderLifecycle::transition(OrderStatus::Completed, OrderStatus::Completed, 10)
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Completed,
            }
        );
    }

    #[test]
    fn test_initial_status() {
        assert_eq!(
            OrderLifecycle::initial(OrderStatus::Completed, 3).unwrap(),
            OrderTransition::Complete { consume_bags: 3 }
        );
        assert!(OrderLifecycle::initial(OrderStatus::Delivered, 3).is_err());
        assert_eq!(
            OrderLifecycle::initial(OrderStatus::Pending, 0),
            Err(OrderError::NonPositiveQuantity)
        );
    }

    #[test]
    fn test_check_stock() {
        assert!(OrderLifecycle::check_stock(10, 10).is_ok());
        assert_eq!(
            OrderLifecycle::check_stock(11, 10),
            Err(OrderError::InsufficientStock {
                requested: 11,
                available: 10
            })
        );
    }

    #[test]
    fn test_check_deletable() {
        assert!(OrderLifecycle::check_deletable(OrderStatus::Pending).is_ok());
        assert!(OrderLifecycle::check_deletable(OrderStatus::Cancelled).is_ok());
        assert_eq!(
            OrderLifecycle::check_deletable(OrderStatus::Completed),
            Err(OrderError::NotDeletable(OrderStatus::Completed))
        );
    }

    #[test]
    fn test_validate_product() {
        assert!(OrderLifecycle::validate_product(dec!(1500), 40).is_ok());
        assert!(OrderLifecycle::validate_product(dec!(0), 0).is_ok());
        assert_eq!(
            OrderLifecycle::validate_product(dec!(-1), 0),
            Err(OrderError::NegativeRate(dec!(-1)))
        );
        assert_eq!(
            OrderLifecycle::validate_product(dec!(1), -2),
            Err(OrderError::NegativeStock(-2))
        );
    }
}
