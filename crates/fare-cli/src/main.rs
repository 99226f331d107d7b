use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fare_cli::commands::{check, split};
use fare_cli::{Cli, Commands, Config, plan_file};

/// Load config, then read and validate the plan file.
fn open_plan(
    config_path: Option<&Path>,
    plan_path: &Path,
    mode: Option<fare_core::SplitMode>,
) -> Result<(fare_core::Plan, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let plan = plan_file::load(plan_path, mode, config.split_mode)?;
    Ok((plan, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON on stdout stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    match &cli.command {
        Some(Commands::Split { plan, mode, json }) => {
            let (plan, config) = open_plan(cli.config.as_deref(), plan, *mode)?;
            split::run(&mut stdout, &plan, *json || config.json)?;
        }
        Some(Commands::Check { plan }) => {
            let (plan, _config) = open_plan(cli.config.as_deref(), plan, None)?;
            check::run(&mut stdout, &plan)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    stdout.flush()?;
    Ok(())
}
