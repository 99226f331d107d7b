//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fare_core::SplitMode;

/// Shared activity cost splitter.
///
/// Splits a time-based fee and shared expenses among people who joined and
/// left at different times, in whole currency units that add up exactly.
#[derive(Debug, Parser)]
#[command(name = "fare", version, about, long_about = None)]
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
    /// Compute each person's contribution for a plan file.
    Split {
        /// Path to the JSON plan file.
        plan: PathBuf,

        /// How to split shared expenses (equal or proportional).
        #[arg(long)]
        mode: Option<SplitMode>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate a plan file and show what it contains.
    Check {
        /// Path to the JSON plan file.
        plan: PathBuf,
    },
}
