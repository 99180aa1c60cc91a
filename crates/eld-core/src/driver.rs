//! Segment driver and the per-trip simulation state.

use crate::ledger::DayLedger;
use crate::plan::PlanError;
use crate::rules::{CounterOverflow, DutyCounters, HosRules};
use crate::status::DutyStatus;
use crate::timeline::DayLog;

/// Upper bound on events injected back to back by one rule evaluation.
///
/// Every event zeroes a counter that triggered it, so a sound rule table
/// needs at most three. Hitting this bound means the evaluator is looping.
pub const MAX_CONSECUTIVE_EVENTS: u32 = 10_000;

const DRIVING_NOTE: &str = "Driving";

/// Mutable state of one trip computation.
///
/// Created fresh per trip and consumed by [`Simulation::finish`]; nothing in
/// here is shared between computations.
#[derive(Debug)]
pub struct Simulation<'a> {
    rules: &'a HosRules,
    ledger: DayLedger,
    counters: DutyCounters,
    cycle_minutes: u64,
    events_injected: u32,
}

impl<'a> Simulation<'a> {
    pub fn new(rules: &'a HosRules) -> Self {
        Self {
            rules,
            ledger: DayLedger::new(),
            counters: DutyCounters::default(),
            cycle_minutes: 0,
            events_injected: 0,
        }
    }

    pub const fn counters(&self) -> &DutyCounters {
        &self.counters
    }

    pub const fn minute_of_day(&self) -> u32 {
        self.ledger.minute_of_day()
    }

    /// Total mandated events injected so far.
    pub const fn events_injected(&self) -> u32 {
        self.events_injected
    }

    /// Minutes recorded in statuses that count toward cycle hours.
    pub const fn cycle_minutes(&self) -> u64 {
        self.cycle_minutes
    }

    /// Records an entry without touching the shift counters.
    pub fn record(&mut self, status: DutyStatus, minutes: u32, note: &str) {
        self.ledger.record(status, minutes, note);
        self.count_cycle(status, minutes);
    }

    /// Records on-duty work that runs inside the shift window.
    pub fn record_on_duty(&mut self, minutes: u32, note: &str) -> Result<(), PlanError> {
        self.record(DutyStatus::OnDutyNotDriving, minutes, note);
        self.counters
            .add_on_duty(minutes)
            .map_err(|source| self.overflow(source))
    }

    fn overflow(&self, source: CounterOverflow) -> PlanError {
        PlanError::CounterOverflow {
            source,
            day: self.ledger.current_day(),
            minute: self.ledger.minute_of_day(),
        }
    }

    fn count_cycle(&mut self, status: DutyStatus, minutes: u32) {
        if status.counts_toward_cycle() {
            self.cycle_minutes += u64::from(minutes);
        }
    }

    /// Injects mandated events until driving may continue.
    ///
    /// Returns the number of events injected by this call.
    pub fn enforce_rules(&mut self) -> Result<u32, PlanError> {
        let mut injected = 0;

        while let Some(event) = self.rules.next_event(&self.counters) {
            if injected >= MAX_CONSECUTIVE_EVENTS {
                return Err(PlanError::InvariantViolation {
                    events: injected,
                    day: self.ledger.current_day(),
                    minute: self.ledger.minute_of_day(),
                });
            }

            let minutes = event.minutes(self.rules);
            tracing::debug!(
                event = event.note(),
                day = self.ledger.current_day(),
                minute = self.ledger.minute_of_day(),
                minutes,
                "injecting mandated event"
            );

            self.record(event.status(), minutes, event.note());
            self.counters
                .apply(event, self.rules)
                .map_err(|source| self.overflow(source))?;
            injected += 1;
        }

        self.events_injected += injected;
        Ok(injected)
    }

    /// Drives `miles` in bounded chunks, stopping for mandated events.
    ///
    /// Chunk minutes are taken from the distance covered so far on this leg,
    /// rounded to whole minutes, so fractional chunks never drift the total.
    pub fn drive_distance(&mut self, miles: f64) -> Result<(), PlanError> {
        if whole_minutes(self.rules.driving_minutes(miles)).is_none() {
            return Err(PlanError::DrivingTimeOverflow { miles });
        }

        let mut covered = 0.0_f64;
        let mut minutes_logged: u32 = 0;
        let mut remaining = miles;

        while remaining > 0.0 {
            self.enforce_rules()?;
            debug_assert!(self.counters.within_limits(self.rules));

            let chunk = remaining.min(self.rules.max_chunk_miles);
            covered += chunk;
            let target = whole_minutes(self.rules.driving_minutes(covered))
                .ok_or(PlanError::DrivingTimeOverflow { miles })?;
            let chunk_minutes = target.saturating_sub(minutes_logged);
            minutes_logged = target;

            tracing::trace!(chunk, chunk_minutes, remaining, "driving chunk");

            self.ledger.record_driving(chunk_minutes, chunk, DRIVING_NOTE);
            self.count_cycle(DutyStatus::Driving, chunk_minutes);
            self.counters
                .add_driving(chunk_minutes, chunk)
                .map_err(|source| self.overflow(source))?;
            remaining -= chunk;
        }

        Ok(())
    }

    /// Pads the open day with off-duty time up to midnight.
    pub fn pad_day(&mut self, note: &str) {
        let left = self.ledger.minutes_left_today();
        self.record(DutyStatus::OffDuty, left, note);
    }

    /// Closes the simulation and returns its day logs.
    pub fn finish(self) -> Vec<DayLog> {
        self.ledger.finish()
    }
}

/// Rounds to whole minutes, or `None` when the result does not fit a `u32`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "range is checked before the cast"
)]
fn whole_minutes(minutes: f64) -> Option<u32> {
    let rounded = minutes.round();
    (0.0..=f64::from(u32::MAX))
        .contains(&rounded)
        .then_some(rounded as u32)
}
