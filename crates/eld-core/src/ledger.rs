//! Day ledger: appends entries and wraps them across midnight.

use crate::status::DutyStatus;
use crate::timeline::{DAY_MINUTES, DayLog, TimelineEntry};

/// Owns the day logs of one simulation and the minute-of-day cursor.
///
/// Entries that run past minute 1440 are split into one entry per day they
/// touch. A day that ends exactly at 1440 is only closed when the next
/// non-empty entry arrives, so neither zero-length entries nor empty days
/// are ever produced.
#[derive(Debug)]
pub struct DayLedger {
    closed: Vec<DayLog>,
    current: DayLog,
    minute_of_day: u32,
}

impl Default for DayLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl DayLedger {
    pub fn new() -> Self {
        Self {
            closed: Vec::new(),
            current: DayLog::new(1),
            minute_of_day: 0,
        }
    }

    /// Current position within the open day.
    pub const fn minute_of_day(&self) -> u32 {
        self.minute_of_day
    }

    /// Index of the open day.
    pub const fn current_day(&self) -> u32 {
        self.current.day_index
    }

    /// Minutes left before the open day is full.
    pub const fn minutes_left_today(&self) -> u32 {
        DAY_MINUTES - self.minute_of_day
    }

    /// Records a non-driving entry. Zero-length entries are ignored.
    pub fn record(&mut self, status: DutyStatus, minutes: u32, note: &str) {
        self.record_distance(status, minutes, 0.0, note);
    }

    /// Records a driving entry that covers `miles`.
    ///
    /// When the entry is split across days, the distance is shared out in
    /// proportion to the minutes that land on each day. A zero-minute chunk
    /// still credits its distance to the open day.
    pub fn record_driving(&mut self, minutes: u32, miles: f64, note: &str) {
        self.record_distance(DutyStatus::Driving, minutes, miles, note);
    }

    fn record_distance(&mut self, status: DutyStatus, minutes: u32, miles: f64, note: &str) {
        if minutes == 0 {
            self.current.miles_driven += miles;
            return;
        }

        let mut remaining = minutes;
        let mut miles_left = miles;

        while remaining > 0 {
            if self.minute_of_day == DAY_MINUTES {
                self.roll_over();
            }

            let fit = remaining.min(self.minutes_left_today());
            let share = if fit == remaining {
                miles_left
            } else {
                miles_left * f64::from(fit) / f64::from(remaining)
            };

            let start = self.minute_of_day;
            self.current.entries.push(TimelineEntry {
                status,
                start_minute: start,
                end_minute: start + fit,
                duration_minutes: fit,
                note: note.to_string(),
            });
            self.current.miles_driven += share;

            self.minute_of_day += fit;
            remaining -= fit;
            miles_left -= share;
        }
    }

    fn roll_over(&mut self) {
        let next = DayLog::new(self.current.day_index + 1);
        let finished = std::mem::replace(&mut self.current, next);
        tracing::trace!(day = finished.day_index, "closed day log");
        self.closed.push(finished);
        self.minute_of_day = 0;
    }

    /// Closes the ledger, dropping a trailing day that holds no entries.
    pub fn finish(mut self) -> Vec<DayLog> {
        if !self.current.entries.is_empty() || self.closed.is_empty() {
            self.closed.push(self.current);
        }
        self.closed
    }
}
