//! Hours of Service log engine.
//!
//! This crate turns the two legs of a trip into a day-by-day duty-status log:
//! - Ledger: per-day logs with entries wrapped across midnight
//! - Rules: refuel, break and reset thresholds evaluated in fixed order
//! - Driver: chunked driving that stops for mandated events
//! - Plan: the trip script from pre-trip inspection to end-of-day padding
//!
//! Everything here is synchronous and free of I/O. Each call to
//! [`plan_trip`] owns its simulation state, so trips may be planned
//! concurrently.

pub mod driver;
pub mod ledger;
mod plan;
pub mod rules;
pub mod status;
pub mod timeline;
pub mod types;

pub use plan::{PlanError, minutes_in_status, plan_from_miles, plan_trip, plan_trips};
pub use rules::{CounterOverflow, DutyCounters, HosRules, MandatedEvent};
pub use status::{DutyStatus, UnknownDutyStatus};
pub use timeline::{DAY_MINUTES, DayLog, StatusTotals, TimelineEntry, TripPlan};
pub use types::{Hours, Miles, TripRequest, ValidationError};
