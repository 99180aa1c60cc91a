//! CLI subcommand implementations.

pub mod batch;
pub mod plan;
pub mod rules;
pub mod util;
