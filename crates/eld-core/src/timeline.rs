//! Day logs and the entries they hold.

use serde::{Deserialize, Serialize};

use crate::status::DutyStatus;

/// Minutes in one log day.
pub const DAY_MINUTES: u32 = 1440;

/// One contiguous stretch of a single duty status within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub status: DutyStatus,

    /// Minute of the day the entry starts, in `[0, 1440)`.
    pub start_minute: u32,

    /// Minute of the day the entry ends, in `(0, 1440]`.
    pub end_minute: u32,

    /// Always `end_minute - start_minute`, never zero.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,

    pub note: String,
}

/// A single day of the driver's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLog {
    /// 1-based day number.
    pub day_index: u32,

    /// `Day N`, or the ISO calendar date when the trip has a start date.
    pub date: String,

    /// Distance attributed to this day's driving entries.
    #[serde(rename = "miles")]
    pub miles_driven: f64,

    pub entries: Vec<TimelineEntry>,
}

impl DayLog {
    /// Creates an empty log for the given day.
    pub fn new(day_index: u32) -> Self {
        Self {
            day_index,
            date: format!("Day {day_index}"),
            miles_driven: 0.0,
            entries: Vec::new(),
        }
    }

    /// Minute at which the last entry ends (0 for an empty day).
    pub fn end_minute(&self) -> u32 {
        self.entries.last().map_or(0, |e| e.end_minute)
    }

    /// Per-status minute totals for the day.
    pub fn status_totals(&self) -> StatusTotals {
        let mut totals = StatusTotals::default();
        for entry in &self.entries {
            totals.add(entry.status, entry.duration_minutes);
        }
        totals
    }
}

/// Minutes spent in each duty status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTotals {
    pub off_duty: u32,
    pub sleeper_berth: u32,
    pub driving: u32,
    pub on_duty_not_driving: u32,
}

impl StatusTotals {
    fn add(&mut self, status: DutyStatus, minutes: u32) {
        *self.get_mut(status) += minutes;
    }

    fn get_mut(&mut self, status: DutyStatus) -> &mut u32 {
        match status {
            DutyStatus::OffDuty => &mut self.off_duty,
            DutyStatus::SleeperBerth => &mut self.sleeper_berth,
            DutyStatus::Driving => &mut self.driving,
            DutyStatus::OnDutyNotDriving => &mut self.on_duty_not_driving,
        }
    }

    /// Minutes recorded for one status.
    pub const fn get(&self, status: DutyStatus) -> u32 {
        match status {
            DutyStatus::OffDuty => self.off_duty,
            DutyStatus::SleeperBerth => self.sleeper_berth,
            DutyStatus::Driving => self.driving,
            DutyStatus::OnDutyNotDriving => self.on_duty_not_driving,
        }
    }

    /// Sum over all statuses.
    pub const fn total(&self) -> u32 {
        self.off_duty + self.sleeper_berth + self.driving + self.on_duty_not_driving
    }
}

/// The finished plan for one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub total_miles: f64,
    pub day_logs: Vec<DayLog>,
    pub final_cycle_hours_used: f64,
}

impl TripPlan {
    /// Totals across every day of the trip.
    pub fn status_totals(&self) -> StatusTotals {
        let mut totals = StatusTotals::default();
        for day in &self.day_logs {
            for entry in &day.entries {
                totals.add(entry.status, entry.duration_minutes);
            }
        }
        totals
    }

    /// All entries in chronological order, paired with their day index.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &TimelineEntry)> {
        self.day_logs
            .iter()
            .flat_map(|day| day.entries.iter().map(move |e| (day.day_index, e)))
    }
}
