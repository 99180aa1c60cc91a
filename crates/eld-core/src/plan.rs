//! Trip assembly: runs the fixed trip script through the simulation.
//!
//! # Script
//!
//! 1. Pre-trip inspection
//! 2. Drive to the pickup
//! 3. Loading
//! 4. Drive to the dropoff
//! 5. Unloading
//! 6. Post-trip inspection
//! 7. Off-duty until the end of the final day

use chrono::{Days, NaiveDate};
use rayon::prelude::*;
use thiserror::Error;

use crate::driver::Simulation;
use crate::rules::{CounterOverflow, HosRules};
use crate::status::DutyStatus;
use crate::timeline::{DayLog, TripPlan};
use crate::types::{TripRequest, ValidationError};

/// Errors produced while planning a trip.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// The request or rule table was rejected before simulation started.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Rule evaluation kept injecting events without letting driving resume.
    #[error(
        "rule evaluation did not settle after {events} consecutive events (day {day}, minute {minute})"
    )]
    InvariantViolation { events: u32, day: u32, minute: u32 },

    /// A shift counter no longer fits in whole minutes.
    #[error("{source} (day {day}, minute {minute})")]
    CounterOverflow {
        source: CounterOverflow,
        day: u32,
        minute: u32,
    },

    /// The driving time of a leg does not fit in whole minutes.
    #[error("driving time for {miles} mi is out of range")]
    DrivingTimeOverflow { miles: f64 },
}

/// Plans a trip under the given rules.
pub fn plan_trip(request: &TripRequest, rules: &HosRules) -> Result<TripPlan, PlanError> {
    rules.validate()?;

    let mut sim = Simulation::new(rules);

    sim.record_on_duty(rules.pre_trip_minutes, "Pre-Trip Inspection")?;
    sim.drive_distance(request.to_pickup.value())?;
    sim.record_on_duty(rules.loading_minutes, "Loading")?;
    sim.drive_distance(request.to_dropoff.value())?;
    sim.record_on_duty(rules.unloading_minutes, "Unloading")?;
    sim.record_on_duty(rules.post_trip_minutes, "Post-Trip Inspection")?;
    sim.pad_day("Off Duty");

    let events_injected = sim.events_injected();
    let cycle_minutes = sim.cycle_minutes();
    let mut day_logs = sim.finish();

    if let Some(start) = request.start_date {
        label_calendar_dates(&mut day_logs, start);
    }

    #[allow(clippy::cast_precision_loss)]
    let final_cycle_hours_used = request.cycle_used.value() + cycle_minutes as f64 / 60.0;

    tracing::debug!(
        total_miles = request.total_miles(),
        days = day_logs.len(),
        events_injected,
        final_cycle_hours_used,
        "planned trip"
    );

    Ok(TripPlan {
        total_miles: request.total_miles(),
        day_logs,
        final_cycle_hours_used,
    })
}

/// Plans a trip from raw numbers using the default rule set.
pub fn plan_from_miles(
    to_pickup: f64,
    to_dropoff: f64,
    cycle_used: f64,
) -> Result<TripPlan, PlanError> {
    let request = TripRequest::new(to_pickup, to_dropoff, cycle_used)?;
    plan_trip(&request, &HosRules::default())
}

/// Plans independent trips in parallel, returning results in input order.
pub fn plan_trips(requests: &[TripRequest], rules: &HosRules) -> Vec<Result<TripPlan, PlanError>> {
    requests
        .par_iter()
        .map(|request| plan_trip(request, rules))
        .collect()
}

fn label_calendar_dates(day_logs: &mut [DayLog], start: NaiveDate) {
    for day in day_logs {
        let offset = Days::new(u64::from(day.day_index - 1));
        match start.checked_add_days(offset) {
            Some(date) => day.date = date.format("%Y-%m-%d").to_string(),
            None => tracing::warn!(
                %start,
                day = day.day_index,
                "calendar date out of range, keeping day label"
            ),
        }
    }
}

/// Total minutes recorded with the given status across a plan.
pub fn minutes_in_status(plan: &TripPlan, status: DutyStatus) -> u32 {
    plan.status_totals().get(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{DAY_MINUTES, TimelineEntry};

    fn summary(entries: &[TimelineEntry]) -> Vec<(DutyStatus, u32, u32, &str)> {
        entries
            .iter()
            .map(|e| (e.status, e.start_minute, e.end_minute, e.note.as_str()))
            .collect()
    }

    fn assert_well_formed(plan: &TripPlan) {
        for (i, day) in plan.day_logs.iter().enumerate() {
            assert_eq!(day.day_index as usize, i + 1);
            let mut cursor = 0;
            for entry in &day.entries {
                assert!(entry.duration_minutes > 0, "empty entry in day {}", day.day_index);
                assert_eq!(entry.start_minute, cursor, "gap in day {}", day.day_index);
                assert_eq!(entry.end_minute - entry.start_minute, entry.duration_minutes);
                cursor = entry.end_minute;
            }
            assert_eq!(cursor, DAY_MINUTES, "day {} not filled", day.day_index);
            assert!(day.miles_driven >= 0.0);
        }
    }

    #[test]
    fn empty_trip_is_one_padded_day() {
        let plan = plan_from_miles(0.0, 0.0, 0.0).unwrap();

        assert_eq!(plan.day_logs.len(), 1);
        let day = &plan.day_logs[0];
        assert_eq!(
            summary(&day.entries),
            vec![
                (DutyStatus::OnDutyNotDriving, 0, 30, "Pre-Trip Inspection"),
                (DutyStatus::OnDutyNotDriving, 30, 90, "Loading"),
                (DutyStatus::OnDutyNotDriving, 90, 150, "Unloading"),
                (DutyStatus::OnDutyNotDriving, 150, 165, "Post-Trip Inspection"),
                (DutyStatus::OffDuty, 165, 1440, "Off Duty"),
            ]
        );
        assert_eq!(day.status_totals().on_duty_not_driving, 165);
        assert_eq!(day.status_totals().off_duty, 1275);
        assert!(day.miles_driven.abs() < f64::EPSILON);
        assert!((plan.final_cycle_hours_used - 2.75).abs() < 1e-9);
    }

    #[test]
    fn five_hundred_miles_takes_one_break() {
        let plan = plan_from_miles(500.0, 0.0, 0.0).unwrap();

        assert_eq!(plan.day_logs.len(), 1);
        let entries = &plan.day_logs[0].entries;

        let brk = entries.iter().find(|e| e.note == "Mandated Break").unwrap();
        assert_eq!((brk.start_minute, brk.end_minute), (510, 540));
        assert_eq!(
            entries.iter().filter(|e| e.status == DutyStatus::OffDuty).count(),
            2
        );

        let after_break: Vec<_> = entries
            .iter()
            .skip_while(|e| e.note != "Mandated Break")
            .skip(1)
            .take(2)
            .collect();
        assert_eq!(after_break[0].status, DutyStatus::Driving);
        assert_eq!(after_break[0].duration_minutes, 20);
        assert_eq!(after_break[1].note, "Loading");

        let last = entries.last().unwrap();
        assert_eq!((last.start_minute, last.note.as_str()), (695, "Off Duty"));
        assert_eq!(minutes_in_status(&plan, DutyStatus::Driving), 500);
        assert!((plan.day_logs[0].miles_driven - 500.0).abs() < 1e-9);
        assert_well_formed(&plan);
    }

    #[test]
    fn seven_hundred_miles_forces_sleeper_reset() {
        let plan = plan_from_miles(700.0, 0.0, 0.0).unwrap();

        assert_eq!(plan.day_logs.len(), 2);
        let reset: Vec<_> = plan
            .entries()
            .filter(|(_, e)| e.status == DutyStatus::SleeperBerth)
            .collect();
        assert_eq!(reset.len(), 1);
        let (day, entry) = reset[0];
        assert_eq!(day, 1);
        assert_eq!((entry.start_minute, entry.end_minute), (720, 1320));
        assert_eq!(entry.note, "10h Reset");

        // Unloading runs over midnight.
        let first_day_tail = plan.day_logs[0].entries.last().unwrap();
        assert_eq!(
            (first_day_tail.note.as_str(), first_day_tail.start_minute),
            ("Unloading", 1420)
        );
        let second_day_head = &plan.day_logs[1].entries[0];
        assert_eq!(
            (second_day_head.note.as_str(), second_day_head.end_minute),
            ("Unloading", 40)
        );

        assert_eq!(minutes_in_status(&plan, DutyStatus::Driving), 700);
        assert_well_formed(&plan);
    }

    #[test]
    fn long_leg_refuels_once_past_fuel_range() {
        let plan = plan_from_miles(1100.0, 0.0, 0.0).unwrap();

        let notes: Vec<(u32, &str, u32)> = plan
            .entries()
            .filter(|(_, e)| e.status != DutyStatus::Driving)
            .map(|(day, e)| (day, e.note.as_str(), e.start_minute))
            .collect();
        assert_eq!(
            notes,
            vec![
                (1, "Pre-Trip Inspection", 0),
                (1, "Mandated Break", 510),
                (1, "10h Reset", 720),
                (2, "Refuel", 240),
                (2, "Loading", 350),
                (2, "Unloading", 410),
                (2, "Post-Trip Inspection", 470),
                (2, "Off Duty", 485),
            ]
        );
        assert_well_formed(&plan);
    }

    #[test]
    fn driving_minutes_match_distance() {
        for (leg1, leg2) in [(0.0, 35.0), (59.0, 61.0), (640.0, 1210.0), (2750.0, 1333.0)] {
            let plan = plan_from_miles(leg1, leg2, 0.0).unwrap();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let expected = (leg1 + leg2) as u32;
            assert_eq!(
                minutes_in_status(&plan, DutyStatus::Driving),
                expected,
                "legs {leg1} + {leg2}"
            );
            let miles: f64 = plan.day_logs.iter().map(|d| d.miles_driven).sum();
            assert!((miles - (leg1 + leg2)).abs() < 1e-6);
            assert_well_formed(&plan);
        }
    }

    #[test]
    fn multi_day_trip_keeps_every_day_whole() {
        let plan = plan_from_miles(1800.0, 2200.0, 0.0).unwrap();
        assert!(plan.day_logs.len() > 3);
        for day in &plan.day_logs {
            assert_eq!(day.status_totals().total(), DAY_MINUTES);
        }
        assert_well_formed(&plan);
    }

    #[test]
    fn cycle_hours_accumulate_from_starting_value() {
        let plan = plan_from_miles(0.0, 0.0, 10.0).unwrap();
        assert!((plan.final_cycle_hours_used - 12.75).abs() < 1e-9);

        // Driving and sleeper time count, the mandated break does not.
        let plan = plan_from_miles(700.0, 0.0, 0.0).unwrap();
        let counted = 30 + 700 + 600 + 60 + 60 + 15;
        assert!((plan.final_cycle_hours_used - f64::from(counted) / 60.0).abs() < 1e-9);
    }

    #[test]
    fn negative_distance_is_invalid_input() {
        let err = plan_from_miles(-1.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidInput(ValidationError::OutOfRange {
                field: "distance",
                ..
            })
        ));
    }

    #[test]
    fn invalid_rules_are_rejected_before_simulation() {
        let rules = HosRules {
            max_chunk_miles: 0.0,
            ..HosRules::default()
        };
        let request = TripRequest::new(10.0, 10.0, 0.0).unwrap();
        let err = plan_trip(&request, &rules).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: invalid rule max_chunk_miles: must be a positive number"
        );
    }

    #[test]
    fn identical_inputs_produce_identical_output() {
        let first = serde_json::to_string(&plan_from_miles(812.5, 1444.0, 31.0).unwrap()).unwrap();
        let second = serde_json::to_string(&plan_from_miles(812.5, 1444.0, 31.0).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn start_date_labels_days_with_calendar_dates() {
        let request = TripRequest::new(700.0, 0.0, 0.0)
            .unwrap()
            .with_start_date(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        let plan = plan_trip(&request, &HosRules::default()).unwrap();

        let dates: Vec<&str> = plan.day_logs.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-02-28", "2025-03-01"]);
    }

    #[test]
    fn out_of_range_dates_keep_day_labels() {
        let request = TripRequest::new(700.0, 0.0, 0.0)
            .unwrap()
            .with_start_date(NaiveDate::MAX);
        let plan = plan_trip(&request, &HosRules::default()).unwrap();

        assert_eq!(plan.day_logs.len(), 2);
        assert_eq!(plan.day_logs[1].date, "Day 2");
    }

    #[test]
    fn trip_ending_at_midnight_has_no_empty_day() {
        let rules = HosRules {
            unloading_minutes: DAY_MINUTES - 30 - 60 - 15,
            ..HosRules::default()
        };
        let request = TripRequest::new(0.0, 0.0, 0.0).unwrap();
        let plan = plan_trip(&request, &rules).unwrap();

        assert_eq!(plan.day_logs.len(), 1);
        assert_eq!(
            plan.day_logs[0].entries.last().unwrap().note,
            "Post-Trip Inspection"
        );
        assert_well_formed(&plan);
    }

    #[test]
    fn speed_too_slow_for_a_chunk_is_rejected() {
        let rules = HosRules {
            avg_speed_mph: 1e-8,
            ..HosRules::default()
        };
        let request = TripRequest::new(1.0, 0.0, 0.0).unwrap();
        let err = plan_trip(&request, &rules).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidInput(ValidationError::InvalidRule {
                rule: "avg_speed_mph",
                ..
            })
        ));
    }

    #[test]
    fn leg_beyond_minute_range_is_an_error() {
        let request = TripRequest::new(1e12, 0.0, 0.0).unwrap();
        let err = plan_trip(&request, &HosRules::default()).unwrap_err();
        assert_eq!(err, PlanError::DrivingTimeOverflow { miles: 1e12 });
        assert_eq!(
            err.to_string(),
            "driving time for 1000000000000 mi is out of range"
        );
    }

    #[test]
    fn batch_planning_preserves_order() {
        let requests = vec![
            TripRequest::new(700.0, 0.0, 0.0).unwrap(),
            TripRequest::new(0.0, 0.0, 0.0).unwrap(),
            TripRequest::new(500.0, 250.0, 5.0).unwrap(),
        ];
        let results = plan_trips(&requests, &HosRules::default());

        assert_eq!(results.len(), 3);
        for (request, result) in requests.iter().zip(&results) {
            let plan = result.as_ref().unwrap();
            assert!((plan.total_miles - request.total_miles()).abs() < f64::EPSILON);
            assert_eq!(plan, &plan_trip(request, &HosRules::default()).unwrap());
        }
    }

    #[test]
    fn plan_serializes_to_wire_contract() {
        let plan = plan_from_miles(0.0, 0.0, 0.0).unwrap();
        let json = serde_json::to_string_pretty(&plan).unwrap();
        insta::assert_snapshot!(json, @r#"
        {
          "totalMiles": 0.0,
          "dayLogs": [
            {
              "dayIndex": 1,
              "date": "Day 1",
              "miles": 0.0,
              "entries": [
                {
                  "status": "ON",
                  "startMinute": 0,
                  "endMinute": 30,
                  "duration": 30,
                  "note": "Pre-Trip Inspection"
                },
                {
                  "status": "ON",
                  "startMinute": 30,
                  "endMinute": 90,
                  "duration": 60,
                  "note": "Loading"
                },
                {
                  "status": "ON",
                  "startMinute": 90,
                  "endMinute": 150,
                  "duration": 60,
                  "note": "Unloading"
                },
                {
                  "status": "ON",
                  "startMinute": 150,
                  "endMinute": 165,
                  "duration": 15,
                  "note": "Post-Trip Inspection"
                },
                {
                  "status": "OFF",
                  "startMinute": 165,
                  "endMinute": 1440,
                  "duration": 1275,
                  "note": "Off Duty"
                }
              ]
            }
          ],
          "finalCycleHoursUsed": 2.75
        }
        "#);
    }
}
