//! Order error types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::OrderStatus;

/// Errors raised by order and product rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Attempted a status change the lifecycle does not allow.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },

    /// Requested more bags than are in stock.
    #[error("Insufficient stock: requested {requested} bags, {available} available")]
    InsufficientStock {
        /// Quantity on the order.
        requested: i32,
        /// Current stock.
        available: i32,
    },

    /// Quantity is zero or negative.
    #[error("Order quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Order can no longer be deleted.
    #[error("Order in status {0} cannot be deleted")]
    NotDeletable(OrderStatus),

    /// Product rate is negative.
    #[error("Product rate cannot be negative: {0}")]
    NegativeRate(Decimal),

    /// Product stock is negative.
    #[error("Product stock cannot be negative: {0}")]
    NegativeStock(i32),
}
