//! Product orders (fertilizer, tea packets) and their lifecycle.
//!
//! Stock is consumed exactly once, at the transition into `Completed`,
//! and the product's rate is snapshotted onto the order at that moment.

pub mod error;
pub mod lifecycle;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use error::OrderError;
pub use lifecycle::{OrderLifecycle, OrderTransition};
pub use types::{OrderCharge, OrderStatus, ProductKind};
