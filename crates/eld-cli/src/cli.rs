//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::commands::util::parse_distance;

/// ELD trip planner.
///
/// Builds an Hours of Service compliant daily log for a trip from the
/// current location to a pickup and on to a dropoff.
#[derive(Debug, Parser)]
#[command(name = "eld", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plan a single trip and print its daily logs.
    Plan(PlanArgs),

    /// Plan trips read as JSON Lines, one result line per trip.
    Batch {
        /// File of trip requests (reads stdin when omitted).
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Show the effective Hours of Service rule table.
    Rules {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for `eld plan`.
#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Distance to the pickup (miles, or with a unit: 560km, 804672m).
    #[arg(long, value_parser = parse_distance)]
    pub to_pickup: f64,

    /// Distance from the pickup to the dropoff.
    #[arg(long, value_parser = parse_distance)]
    pub to_dropoff: f64,

    /// Cycle hours already used before the trip.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub cycle_used: f64,

    /// Calendar date of the first day (YYYY-MM-DD).
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Output as JSON.
    #[arg(long, conflicts_with = "grid")]
    pub json: bool,

    /// Draw a log-sheet grid for each day.
    #[arg(long)]
    pub grid: bool,
}
