//! Batch command for planning many trips from JSON Lines.
//!
//! Each non-blank input line is a trip request. Output has one line per
//! request, in input order: `{"index":0,"plan":{...}}` on success or
//! `{"index":0,"error":"..."}` when the line is malformed or the trip
//! cannot be planned.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use eld_core::{HosRules, TripPlan, TripRequest, plan_trips};
use serde::Serialize;

/// One output line.
#[derive(Debug, Serialize)]
struct BatchLine {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<TripPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Counts reported after a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub planned: usize,
    pub failed: usize,
}

pub fn run<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    rules: &HosRules,
) -> Result<BatchSummary> {
    let mut parsed: Vec<Result<TripRequest, String>> = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read input line {}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        parsed.push(serde_json::from_str(&line).map_err(|e| e.to_string()));
    }
    tracing::debug!(requests = parsed.len(), "loaded trip requests");

    let requests: Vec<TripRequest> = parsed.iter().filter_map(|r| r.clone().ok()).collect();
    let mut plans = plan_trips(&requests, rules).into_iter();

    let mut summary = BatchSummary::default();
    for (index, request) in parsed.into_iter().enumerate() {
        let outcome = match request {
            Ok(_) => match plans.next() {
                Some(result) => result.map_err(|e| e.to_string()),
                None => anyhow::bail!("planner returned fewer results than requests"),
            },
            Err(e) => Err(e),
        };

        let line = match outcome {
            Ok(plan) => {
                summary.planned += 1;
                BatchLine {
                    index,
                    plan: Some(plan),
                    error: None,
                }
            }
            Err(error) => {
                summary.failed += 1;
                tracing::warn!(index, error = %error, "skipping trip");
                BatchLine {
                    index,
                    plan: None,
                    error: Some(error),
                }
            }
        };
        writeln!(writer, "{}", serde_json::to_string(&line)?)?;
    }

    tracing::debug!(
        planned = summary.planned,
        failed = summary.failed,
        "batch complete"
    );
    Ok(summary)
}
