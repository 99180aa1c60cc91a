//! Plan command for building the daily logs of one trip.
//!
//! This module implements `eld plan` with human-readable, grid and JSON
//! output.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use eld_core::{DayLog, DutyStatus, TripPlan, TripRequest, plan_trip};

use super::util::{clock, format_minutes};
use crate::cli::PlanArgs;
use crate::config::{Config, OutputFormat};

/// Grid resolution in minutes per cell.
const GRID_CELL_MINUTES: u32 = 15;

/// Builds a validated trip request from command arguments.
pub fn build_request(args: &PlanArgs) -> Result<TripRequest> {
    let request = TripRequest::new(args.to_pickup, args.to_dropoff, args.cycle_used)
        .context("invalid trip request")?;

    Ok(match args.start_date {
        Some(date) => request.with_start_date(date),
        None => request,
    })
}

// ========== Text Output ==========

/// Formats the human-readable plan, optionally with a grid per day.
pub fn format_plan(request: &TripRequest, plan: &TripPlan, grid: bool) -> String {
    let mut output = String::new();

    let day_count = plan.day_logs.len();
    let day_word = if day_count == 1 { "day" } else { "days" };
    writeln!(
        output,
        "TRIP PLAN: {:.1} mi over {day_count} {day_word}",
        plan.total_miles
    )
    .unwrap();
    writeln!(
        output,
        "Cycle hours: {:.2}h -> {:.2}h",
        request.cycle_used.value(),
        plan.final_cycle_hours_used
    )
    .unwrap();

    for day in &plan.day_logs {
        writeln!(output).unwrap();
        format_day(&mut output, day);
        if grid {
            writeln!(output).unwrap();
            output.push_str(&format_grid(day));
        }
    }

    output
}

fn format_day(output: &mut String, day: &DayLog) {
    writeln!(output, "{} · {:.1} mi", day.date, day.miles_driven).unwrap();

    for entry in &day.entries {
        writeln!(
            output,
            "  {}-{}  {:<3}  {:<22}{:>8}",
            clock(entry.start_minute),
            clock(entry.end_minute),
            entry.status.code(),
            entry.note,
            format_minutes(entry.duration_minutes)
        )
        .unwrap();
    }

    let totals = day.status_totals();
    let parts: Vec<String> = DutyStatus::ALL
        .iter()
        .map(|status| format!("{} {}", status.code(), format_minutes(totals.get(*status))))
        .collect();
    writeln!(output, "  Totals: {}", parts.join("  ")).unwrap();
}

// ========== Grid Output ==========

/// Draws the day as a log-sheet grid: one row per status, one cell per
/// quarter hour, marking the status in effect at the start of each cell.
pub fn format_grid(day: &DayLog) -> String {
    let mut output = String::new();

    let mut header = String::from("    ");
    for hour in 0..24 {
        write!(header, "{hour:<4}").unwrap();
    }
    writeln!(output, "{}", header.trim_end()).unwrap();

    let totals = day.status_totals();
    let cells = eld_core::DAY_MINUTES / GRID_CELL_MINUTES;

    for status in DutyStatus::ALL {
        let row: String = (0..cells)
            .map(|cell| {
                if status_at(day, cell * GRID_CELL_MINUTES) == Some(status) {
                    '█'
                } else {
                    '·'
                }
            })
            .collect();
        writeln!(
            output,
            "{:<4}{row}  {}",
            status.code(),
            format_minutes(totals.get(status))
        )
        .unwrap();
    }

    output
}

fn status_at(day: &DayLog, minute: u32) -> Option<DutyStatus> {
    day.entries
        .iter()
        .find(|e| e.start_minute <= minute && minute < e.end_minute)
        .map(|e| e.status)
}

// ========== Public Interface ==========

pub fn run<W: Write>(writer: &mut W, config: &Config, args: &PlanArgs) -> Result<()> {
    let request = build_request(args)?;
    let plan = plan_trip(&request, &config.rules).context("failed to plan trip")?;

    let as_json = args.json || (config.format == OutputFormat::Json && !args.grid);
    if as_json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&plan)?)?;
    } else {
        write!(writer, "{}", format_plan(&request, &plan, args.grid))?;
    }

    Ok(())
}
