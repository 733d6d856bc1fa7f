//! Leaf collection weights and gross income aggregation.
//!
//! # Modules
//!
//! - `types` - Weighing input, aggregation lines and summaries
//! - `error` - Weighing validation errors
//! - `aggregator` - Net weight and gross income calculation

pub mod aggregator;
pub mod error;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::{CollectionAggregator, net_weight};
pub use error::CollectionError;
pub use types::{CollectionLine, CollectionSummary, LeafWeighing};
