//! Shared activity cost splitter CLI library.
//!
//! This crate provides the CLI interface for splitting costs.

mod cli;
pub mod commands;
mod config;
pub mod plan_file;

pub use cli::{Cli, Commands};
pub use config::Config;
