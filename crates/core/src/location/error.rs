//! Location error types.

use thiserror::Error;

/// Errors raised when a reported fix is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LocationError {
    /// Latitude outside [-90, 90].
    #[error("Latitude {0} is out of range")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180].
    #[error("Longitude {0} is out of range")]
    LongitudeOutOfRange(f64),

    /// Heading outside [0, 360).
    #[error("Heading {0} is out of range")]
    HeadingOutOfRange(f64),

    /// Speed below zero or not a number.
    #[error("Speed {0} is invalid")]
    InvalidSpeed(f64),
}
