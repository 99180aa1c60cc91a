//! Hours of Service rule table and the mandated-event evaluator.
//!
//! # Evaluation order
//!
//! Before each driving chunk the evaluator checks, in order:
//!
//! 1. Fuel range reached: 30 min on-duty refuel
//! 2. Continuous driving limit reached: 30 min off-duty break
//! 3. Shift driving or on-duty limit reached: 10 h sleeper-berth reset
//!
//! After an event is applied evaluation restarts from rule 1, so several
//! events can be stacked before the next chunk. The order is fixed: a refuel
//! never waits behind a break, and a break is taken in preference to a reset
//! whenever both the break and reset conditions hold.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::DutyStatus;
use crate::timeline::DAY_MINUTES;
use crate::types::ValidationError;

/// Regulatory and operational constants used by the simulation.
///
/// `Default` is the property-carrying interstate rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HosRules {
    /// Average driving speed. Default: 60 mph (1 minute per mile).
    pub avg_speed_mph: f64,

    /// Driving minutes allowed before a break. Default: 480 (8h).
    pub break_after_driving_minutes: u32,

    /// Driving minutes allowed per shift. Default: 660 (11h).
    pub max_shift_driving_minutes: u32,

    /// On-duty window per shift. Default: 840 (14h).
    pub max_shift_on_duty_minutes: u32,

    /// Default: 30.
    pub break_minutes: u32,

    /// Sleeper-berth reset length. Default: 600 (10h).
    pub reset_minutes: u32,

    /// Default: 1000 miles.
    pub fuel_range_miles: f64,

    /// Default: 30.
    pub refuel_minutes: u32,

    /// Default: 30.
    pub pre_trip_minutes: u32,

    /// Default: 15.
    pub post_trip_minutes: u32,

    /// Default: 60.
    pub loading_minutes: u32,

    /// Default: 60.
    pub unloading_minutes: u32,

    /// Longest distance driven between rule checks. Default: 60 miles.
    pub max_chunk_miles: f64,
}

impl Default for HosRules {
    fn default() -> Self {
        Self {
            avg_speed_mph: 60.0,
            break_after_driving_minutes: 480, // 8 hours
            max_shift_driving_minutes: 660,   // 11 hours
            max_shift_on_duty_minutes: 840,   // 14 hours
            break_minutes: 30,
            reset_minutes: 600, // 10 hours
            fuel_range_miles: 1000.0,
            refuel_minutes: 30,
            pre_trip_minutes: 30,
            post_trip_minutes: 15,
            loading_minutes: 60,
            unloading_minutes: 60,
            max_chunk_miles: 60.0,
        }
    }
}

impl HosRules {
    /// Checks that the table can drive a terminating simulation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = |value: f64| value.is_finite() && value > 0.0;

        if !positive(self.avg_speed_mph) {
            return Err(ValidationError::InvalidRule {
                rule: "avg_speed_mph",
                reason: "must be a positive number",
            });
        }
        if !positive(self.max_chunk_miles) {
            return Err(ValidationError::InvalidRule {
                rule: "max_chunk_miles",
                reason: "must be a positive number",
            });
        }
        if !positive(self.fuel_range_miles) {
            return Err(ValidationError::InvalidRule {
                rule: "fuel_range_miles",
                reason: "must be a positive number",
            });
        }
        if self.driving_minutes(self.max_chunk_miles) > f64::from(DAY_MINUTES) {
            return Err(ValidationError::InvalidRule {
                rule: "avg_speed_mph",
                reason: "a full driving chunk must fit in one day",
            });
        }

        let thresholds = [
            ("break_after_driving_minutes", self.break_after_driving_minutes),
            ("max_shift_driving_minutes", self.max_shift_driving_minutes),
            ("max_shift_on_duty_minutes", self.max_shift_on_duty_minutes),
        ];
        for (rule, minutes) in thresholds {
            if minutes == 0 {
                return Err(ValidationError::InvalidRule {
                    rule,
                    reason: "threshold must be at least one minute",
                });
            }
        }

        Ok(())
    }

    /// Driving time for a distance at the average speed, in fractional minutes.
    pub fn driving_minutes(&self, miles: f64) -> f64 {
        miles * 60.0 / self.avg_speed_mph
    }

    /// Returns the first mandated event whose condition holds, if any.
    pub fn next_event(&self, counters: &DutyCounters) -> Option<MandatedEvent> {
        if counters.miles_since_fuel >= self.fuel_range_miles {
            return Some(MandatedEvent::Refuel);
        }

        if counters.driving_since_break >= self.break_after_driving_minutes {
            return Some(MandatedEvent::Break);
        }

        if counters.driving_this_shift >= self.max_shift_driving_minutes
            || counters.on_duty_this_shift >= self.max_shift_on_duty_minutes
        {
            return Some(MandatedEvent::Reset);
        }

        None
    }
}

/// A duty counter would pass `u32::MAX` minutes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("duty counter {counter} overflowed")]
pub struct CounterOverflow {
    pub counter: &'static str,
}

fn bump(value: &mut u32, minutes: u32, counter: &'static str) -> Result<(), CounterOverflow> {
    *value = value.checked_add(minutes).ok_or(CounterOverflow { counter })?;
    Ok(())
}

/// Running duty counters for the current shift.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DutyCounters {
    /// Driving minutes since the last qualifying break or reset.
    pub driving_since_break: u32,

    /// Driving minutes since the last reset.
    pub driving_this_shift: u32,

    /// Elapsed on-duty window since the last reset, breaks included.
    pub on_duty_this_shift: u32,

    pub miles_since_fuel: f64,
}

impl DutyCounters {
    /// Accounts for a driving chunk.
    pub fn add_driving(&mut self, minutes: u32, miles: f64) -> Result<(), CounterOverflow> {
        bump(&mut self.driving_since_break, minutes, "driving_since_break")?;
        bump(&mut self.driving_this_shift, minutes, "driving_this_shift")?;
        self.add_on_duty(minutes)?;
        self.miles_since_fuel += miles;
        Ok(())
    }

    /// Accounts for non-driving time inside the shift window.
    pub fn add_on_duty(&mut self, minutes: u32) -> Result<(), CounterOverflow> {
        bump(&mut self.on_duty_this_shift, minutes, "on_duty_this_shift")
    }

    /// Resets the counters the event satisfies.
    pub fn apply(
        &mut self,
        event: MandatedEvent,
        rules: &HosRules,
    ) -> Result<(), CounterOverflow> {
        match event {
            MandatedEvent::Refuel => {
                self.miles_since_fuel = 0.0;
                self.add_on_duty(rules.refuel_minutes)
            }
            MandatedEvent::Break => {
                self.driving_since_break = 0;
                self.add_on_duty(rules.break_minutes)
            }
            MandatedEvent::Reset => {
                self.driving_since_break = 0;
                self.driving_this_shift = 0;
                self.on_duty_this_shift = 0;
                Ok(())
            }
        }
    }

    /// True when every counter is strictly below its trigger.
    pub fn within_limits(&self, rules: &HosRules) -> bool {
        rules.next_event(self).is_none()
    }
}

/// An event the rules force before driving may continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MandatedEvent {
    Refuel,
    Break,
    Reset,
}

impl MandatedEvent {
    pub const fn status(self) -> DutyStatus {
        match self {
            Self::Refuel => DutyStatus::OnDutyNotDriving,
            Self::Break => DutyStatus::OffDuty,
            Self::Reset => DutyStatus::SleeperBerth,
        }
    }

    /// Log note written for the event.
    pub const fn note(self) -> &'static str {
        match self {
            Self::Refuel => "Refuel",
            Self::Break => "Mandated Break",
            Self::Reset => "10h Reset",
        }
    }

    pub const fn minutes(self, rules: &HosRules) -> u32 {
        match self {
            Self::Refuel => rules.refuel_minutes,
            Self::Break => rules.break_minutes,
            Self::Reset => rules.reset_minutes,
        }
    }
}
