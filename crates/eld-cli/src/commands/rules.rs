//! Rules command for showing the effective rule table.

use std::io::Write;

use anyhow::Result;
use eld_core::HosRules;

use super::util::format_minutes;

pub fn run<W: Write>(writer: &mut W, rules: &HosRules, json: bool) -> Result<()> {
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(rules)?)?;
        return Ok(());
    }

    writeln!(writer, "HOS RULES")?;
    writeln!(writer, "─────────")?;
    writeln!(writer, "Average speed:        {} mph", rules.avg_speed_mph)?;
    writeln!(writer, "Fuel range:           {} mi", rules.fuel_range_miles)?;
    writeln!(writer, "Max drive chunk:      {} mi", rules.max_chunk_miles)?;

    let durations = [
        ("Break after driving:", rules.break_after_driving_minutes),
        ("Driving per shift:", rules.max_shift_driving_minutes),
        ("On-duty per shift:", rules.max_shift_on_duty_minutes),
        ("Break:", rules.break_minutes),
        ("Sleeper reset:", rules.reset_minutes),
        ("Refuel:", rules.refuel_minutes),
        ("Pre-trip:", rules.pre_trip_minutes),
        ("Post-trip:", rules.post_trip_minutes),
        ("Loading:", rules.loading_minutes),
        ("Unloading:", rules.unloading_minutes),
    ];
    for (label, minutes) in durations {
        writeln!(writer, "{label:<22}{}", format_minutes(minutes))?;
    }

    Ok(())
}
