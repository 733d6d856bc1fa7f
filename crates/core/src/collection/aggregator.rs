//! Net weight and gross income aggregation.

use rust_decimal::Decimal;

use super::types::{CollectionLine, CollectionSummary};

/// Net leaf weight after subtracting water and bag weight.
///
/// Not clamped at zero: stored rows are aggregated exactly as recorded.
#[must_use]
pub fn net_weight(gross_kg: Decimal, water_kg: Decimal, bag_kg: Decimal) -> Decimal {
    gross_kg - water_kg - bag_kg
}

/// Stateless aggregator over a supplier's stored collections.
pub struct CollectionAggregator;

impl CollectionAggregator {
    /// Sum of `net_weight_kg * rate_at_collection` across all lines.
    ///
    /// Zero lines yield zero.
    #[must_use]
    pub fn gross_income(lines: &[CollectionLine]) -> Decimal {
        lines.iter().map(CollectionLine::income).sum()
    }

    /// Delivery count, total net weight and gross income in one pass.
    #[must_use]
    pub fn summarize(lines: &[CollectionLine]) -> CollectionSummary {
        lines.iter().fold(
            CollectionSummary {
                deliveries: 0,
                total_net_weight_kg: Decimal::ZERO,
                gross_income: Decimal::ZERO,
            },
            |acc, line| CollectionSummary {
                deliveries: acc.deliveries + 1,
                total_net_weight_kg: acc.total_net_weight_kg + line.net_weight_kg,
                gross_income: acc.gross_income + line.income(),
            },
        )
    }
}
