//! Driver GPS fixes relayed to suppliers.

pub mod error;
pub mod types;

pub use error::LocationError;
pub use types::{LocationFix, LocationUpdate};
