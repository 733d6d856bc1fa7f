//! Property-based tests for the collection aggregator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregator::{CollectionAggregator, net_weight};
use super::types::{CollectionLine, LeafWeighing};

/// Weights in grams turned into kg with three decimals.
fn arb_kg() -> impl Strategy<Value = Decimal> {
    (0i64..500_000).prop_map(|grams| Decimal::new(grams, 3))
}

/// Rates in cents.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..50_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_line() -> impl Strategy<Value = CollectionLine> {
    (arb_kg(), arb_rate()).prop_map(|(net_weight_kg, rate_at_collection)| CollectionLine {
        net_weight_kg,
        rate_at_collection,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Net weight plus the deductions always gives back the gross weight.
    #[test]
    fn prop_net_weight_restores_gross(gross in arb_kg(), water in arb_kg(), bag in arb_kg()) {
        prop_assert_eq!(net_weight(gross, water, bag) + water + bag, gross);
    }

    /// A weighing that passes validation never has a negative net weight.
    #[test]
    fn prop_valid_weighing_has_non_negative_net(
        gross in arb_kg(),
        water in arb_kg(),
        bag in arb_kg(),
        rate in arb_rate(),
    ) {
        let weighing = LeafWeighing {
            gross_weight_kg: gross,
            water_weight_kg: water,
            bag_weight_kg: bag,
            rate_at_collection: rate,
        };
        if weighing.validate().is_ok() {
            prop_assert!(weighing.net_weight_kg() >= Decimal::ZERO);
        }
    }

    /// Gross income is additive over any split of the lines.
    #[test]
    fn prop_gross_income_is_additive(
        lines in prop::collection::vec(arb_line(), 0..30),
        split in 0usize..30,
    ) {
        let split = split.min(lines.len());
        let (left, right) = lines.split_at(split);
        prop_assert_eq!(
            CollectionAggregator::gross_income(&lines),
            CollectionAggregator::gross_income(left) + CollectionAggregator::gross_income(right)
        );
    }

    /// Summary agrees with the standalone gross income and counts every line.
    #[test]
    fn prop_summary_matches_gross_income(lines in prop::collection::vec(arb_line(), 0..30)) {
        let summary = CollectionAggregator::summarize(&lines);
        prop_assert_eq!(summary.gross_income, CollectionAggregator::gross_income(&lines));
        prop_assert_eq!(summary.deliveries, lines.len() as u64);
    }
}
