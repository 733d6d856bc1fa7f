//! Location data types.
//!
//! Coordinates are plain `f64`: they are only range checked and relayed,
//! never used in arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::LocationError;

/// A position reported by a driver's device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
    /// Compass heading in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    /// Ground speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<f64>,
}

impl LocationFix {
    /// Rejects fixes outside the valid coordinate ranges, including NaN.
    pub fn validate(&self) -> Result<(), LocationError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(LocationError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(LocationError::LongitudeOutOfRange(self.longitude));
        }
        if let Some(heading) = self.heading {
            if !(0.0..360.0).contains(&heading) {
                return Err(LocationError::HeadingOutOfRange(heading));
            }
        }
        if let Some(speed) = self.speed_kmh {
            if !speed.is_finite() || speed < 0.0 {
                return Err(LocationError::InvalidSpeed(speed));
            }
        }
        Ok(())
    }
}

/// A validated fix stamped with the publishing driver and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// Driver code.
    pub driver_id: String,
    /// The fix itself.
    #[serde(flatten)]
    pub fix: LocationFix,
    /// When the hub received it.
    pub recorded_at: DateTime<Utc>,
}

impl LocationUpdate {
    /// Validates `fix` and stamps it.
    pub fn new(
        driver_id: impl Into<String>,
        fix: LocationFix,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, LocationError> {
        fix.validate()?;
        Ok(Self {
            driver_id: driver_id.into(),
            fix,
            recorded_at,
        })
    }
}
