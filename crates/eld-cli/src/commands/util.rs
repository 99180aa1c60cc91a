//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;

/// Pre-compiled regex for distance parsing.
static DISTANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(mi|miles?|km|kilometers?|m|meters?)?\s*$").unwrap()
});

const METERS_PER_MILE: f64 = 1609.344;
const KM_PER_MILE: f64 = METERS_PER_MILE / 1000.0;

/// Parse a distance string into miles.
///
/// Supports:
/// - Plain numbers, taken as miles: "350", "12.5"
/// - Unit suffixes: "350mi", "560 km", "804672m"
pub fn parse_distance(s: &str) -> anyhow::Result<f64> {
    let Some(caps) = DISTANCE_RE.captures(s) else {
        anyhow::bail!("Invalid distance: {s}. Use miles (e.g., 350) or a unit (e.g., 560km)");
    };

    let value: f64 = caps[1]
        .parse()
        .context("failed to parse number in distance")?;

    let unit = caps
        .get(2)
        .map_or_else(|| "mi".to_string(), |m| m.as_str().to_ascii_lowercase());

    let miles = match unit.as_str() {
        "mi" | "mile" | "miles" => value,
        "km" | "kilometer" | "kilometers" => value / KM_PER_MILE,
        "m" | "meter" | "meters" => value / METERS_PER_MILE,
        unit => anyhow::bail!("Unknown distance unit: {unit}"),
    };

    Ok(miles)
}

/// Formats minutes as "Xh Ym" when at least an hour, "Xm" otherwise.
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;

    if hours >= 1 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    }
}

/// Formats a minute of the day as `HH:MM` (minute 1440 is `24:00`).
pub fn clock(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}
