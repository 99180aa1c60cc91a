use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use eld_cli::commands::{batch, plan, rules};
use eld_cli::{Cli, Commands, Config};

/// Load config and check that its rule table is usable.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    config
        .rules
        .validate()
        .context("invalid rules in configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Plan(args)) => {
            let config = load_config(cli.config.as_deref())?;
            plan::run(&mut stdout, &config, args)?;
        }
        Some(Commands::Batch { input }) => {
            let config = load_config(cli.config.as_deref())?;
            let summary = match input {
                Some(path) => {
                    let file = File::open(path)
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    batch::run(BufReader::new(file), &mut stdout, &config.rules)?
                }
                None => batch::run(io::stdin().lock(), &mut stdout, &config.rules)?,
            };
            if summary.failed > 0 {
                tracing::warn!(failed = summary.failed, "some trips could not be planned");
            }
        }
        Some(Commands::Rules { json }) => {
            let config = load_config(cli.config.as_deref())?;
            rules::run(&mut stdout, &config.rules, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
