//! ELD trip planner CLI library.
//!
//! This crate provides the CLI interface for the Hours of Service planner.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, PlanArgs};
pub use config::{Config, OutputFormat};
