//! Collection data types.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::aggregator::net_weight;
use super::error::CollectionError;

/// Weights recorded on the scale for one delivery, plus the rate in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafWeighing {
    /// Gross weight of the delivered bags.
    pub gross_weight_kg: Decimal,
    /// Water weight deducted by the collector.
    pub water_weight_kg: Decimal,
    /// Weight of the empty bags.
    pub bag_weight_kg: Decimal,
    /// Rate per kg at the time of collection. Stored as a snapshot.
    pub rate_at_collection: Decimal,
}

impl LeafWeighing {
    /// Net weight of this delivery.
    #[must_use]
    pub fn net_weight_kg(&self) -> Decimal {
        net_weight(
            self.gross_weight_kg,
            self.water_weight_kg,
            self.bag_weight_kg,
        )
    }

    /// Validates the weighing before it is stored.
    ///
    /// All values must be non-negative, the gross weight must be positive, and
    /// the water and bag deductions together may not exceed the gross weight.
    pub fn validate(&self) -> Result<(), CollectionError> {
        for (field, value) in [
            ("gross weight", self.gross_weight_kg),
            ("water weight", self.water_weight_kg),
            ("bag weight", self.bag_weight_kg),
            ("rate", self.rate_at_collection),
        ] {
            if value < Decimal::ZERO {
                return Err(CollectionError::NegativeValue { field });
            }
        }

        if self.gross_weight_kg.is_zero() {
            return Err(CollectionError::EmptyDelivery);
        }

        if self.water_weight_kg + self.bag_weight_kg > self.gross_weight_kg {
            return Err(CollectionError::DeductionsExceedGross {
                gross_kg: self.gross_weight_kg,
                water_kg: self.water_weight_kg,
                bag_kg: self.bag_weight_kg,
            });
        }

        Ok(())
    }

    /// Rounds weights to grams and the rate to cents, the precision they are
    /// stored with.
    #[must_use]
    pub fn rounded(&self) -> Self {
        let round = |v: Decimal, dp: u32| {
            v.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        };
        Self {
            gross_weight_kg: round(self.gross_weight_kg, 3),
            water_weight_kg: round(self.water_weight_kg, 3),
            bag_weight_kg: round(self.bag_weight_kg, 3),
            rate_at_collection: round(self.rate_at_collection, 2),
        }
    }

    /// Converts to the line consumed by the aggregator.
    #[must_use]
    pub fn to_line(&self) -> CollectionLine {
        CollectionLine {
            net_weight_kg: self.net_weight_kg(),
            rate_at_collection: self.rate_at_collection,
        }
    }
}

/// The two figures of a stored collection that income depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLine {
    /// Stored net weight.
    pub net_weight_kg: Decimal,
    /// Stored rate snapshot.
    pub rate_at_collection: Decimal,
}

impl CollectionLine {
    /// Income earned by this delivery.
    #[must_use]
    pub fn income(&self) -> Decimal {
        self.net_weight_kg * self.rate_at_collection
    }
}

/// Per-supplier collection totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Number of deliveries.
    pub deliveries: u64,
    /// Sum of net weights.
    pub total_net_weight_kg: Decimal,
    /// Sum of net weight times rate.
    pub gross_income: Decimal,
}
