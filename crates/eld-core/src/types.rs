//! Core input types with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for trip inputs and rule tables.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A distance or hour value was negative, NaN or infinite.
    #[error("{field} must be a finite, non-negative number, got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    /// A rule table entry cannot drive a simulation.
    #[error("invalid rule {rule}: {reason}")]
    InvalidRule {
        rule: &'static str,
        reason: &'static str,
    },
}

/// Generates a validated non-negative quantity newtype.
macro_rules! define_quantity {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            /// Zero quantity.
            pub const ZERO: Self = Self(0.0);

            /// Creates a new quantity after validation.
            pub fn new(value: f64) -> Result<Self, ValidationError> {
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::OutOfRange {
                        field: $field_name,
                        value,
                    });
                }
                Ok(Self(value))
            }

            /// Returns the inner value.
            #[must_use]
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl TryFrom<f64> for $name {
            type Error = ValidationError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(q: $name) -> Self {
                q.0
            }
        }
    };
}

define_quantity!(
    /// A validated leg distance in miles.
    Miles, "distance"
);

define_quantity!(
    /// A validated number of duty-cycle hours.
    Hours, "cycle hours"
);

/// A two-leg trip: current location to pickup, then pickup to dropoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    /// Distance from the current location to the pickup.
    #[serde(alias = "leg1Miles")]
    pub to_pickup: Miles,

    /// Distance from the pickup to the dropoff.
    #[serde(alias = "leg2Miles")]
    pub to_dropoff: Miles,

    /// Cycle hours already used before the trip starts.
    #[serde(default, alias = "cycleUsedHours")]
    pub cycle_used: Hours,

    /// Calendar date of the first day; day logs are labelled `Day N` without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl TripRequest {
    /// Builds a request from raw numbers, validating each one.
    pub fn new(to_pickup: f64, to_dropoff: f64, cycle_used: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            to_pickup: Miles::new(to_pickup)?,
            to_dropoff: Miles::new(to_dropoff)?,
            cycle_used: Hours::new(cycle_used)?,
            start_date: None,
        })
    }

    /// Sets the calendar date of the first day.
    #[must_use]
    pub const fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Combined distance of both legs.
    pub fn total_miles(&self) -> f64 {
        self.to_pickup.value() + self.to_dropoff.value()
    }
}
