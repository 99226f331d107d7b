//! CLI subcommand implementations.

pub mod check;
pub mod split;
pub mod util;
