//! Order data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product order status.
///
/// The valid transitions are:
/// - Pending → Delivered (dispatched to the supplier)
/// - Pending → Completed, Delivered → Completed (fulfilment confirmed)
/// - Pending → Cancelled, Delivered → Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed by the supplier.
    Pending,
    /// Dispatched, awaiting confirmation.
    Delivered,
    /// Confirmed. Stock consumed and charged to the supplier.
    Completed,
    /// Withdrawn before completion.
    Cancelled,
}

impl OrderStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "delivered" => Some(Self::Delivered),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Fertilizer bags.
    Fertilizer,
    /// Packets of made tea sold back to suppliers.
    TeaPacket,
}

impl ProductKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fertilizer => "fertilizer",
            Self::TeaPacket => "tea_packet",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fertilizer" => Some(Self::Fertilizer),
            "tea_packet" | "tea packet" | "teapacket" => Some(Self::TeaPacket),
            _ => None,
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored order as seen by the deduction resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderCharge {
    /// Bags ordered.
    pub quantity: i32,
    /// Current status.
    pub status: OrderStatus,
    /// Rate per bag captured when the order completed.
    pub rate_at_completion: Option<Decimal>,
}

impl OrderCharge {
    /// Amount charged to the supplier for this order.
    ///
    /// Only completed orders are charged.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        match (self.status, self.rate_at_completion) {
            (OrderStatus::Completed, Some(rate)) => Decimal::from(self.quantity) * rate,
            _ => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_parse() {
        assert_eq!(OrderStatus::parse("Completed"), Some(OrderStatus::Completed));
        assert_eq!(OrderStatus::parse("canceled"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(ProductKind::parse("Tea Packet"), Some(ProductKind::TeaPacket));
        assert_eq!(ProductKind::parse("fertilizer"), Some(ProductKind::Fertilizer));
        assert_eq!(ProductKind::parse("seeds"), None);
    }

    #[test]
    fn test_only_completed_orders_are_charged() {
        let pending = OrderCharge {
            quantity: 10,
            status: OrderStatus::Pending,
            rate_at_completion: None,
        };
        assert_eq!(pending.amount(), Decimal::ZERO);

        let completed = OrderCharge {
            status: OrderStatus::Completed,
            rate_at_completion: Some(dec!(50)),
            ..pending
        };
        assert_eq!(completed.amount(), dec!(500));
    }
}
