//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;

/// Pre-compiled regex for `H:MM` / `HH:MM` clock strings.
static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,2}):(\d{2})\s*$").unwrap());

/// Parse a clock string into `(hour, minute)`.
///
/// Only the shape is checked here. Range checks (hour 0-23, minute 0-59)
/// belong to `fare_core`, so "24:00" parses and is rejected later with a
/// proper validation error.
pub fn parse_clock(s: &str) -> anyhow::Result<(i64, i64)> {
    let Some(caps) = CLOCK_RE.captures(s) else {
        anyhow::bail!("Invalid time: {s:?}. Use HH:MM (e.g., 18:30)");
    };

    let hour: i64 = caps[1].parse().context("failed to parse hour")?;
    let minute: i64 = caps[2].parse().context("failed to parse minute")?;
    Ok((hour, minute))
}

/// Parse an optional clock string into optional `(hour, minute)` parts.
pub fn parse_optional_clock(s: Option<&str>) -> anyhow::Result<(Option<i64>, Option<i64>)> {
    match s.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => {
            let (hour, minute) = parse_clock(s)?;
            Ok((Some(hour), Some(minute)))
        }
        None => Ok((None, None)),
    }
}

/// Formats minutes as hours with two decimals.
#[allow(clippy::cast_precision_loss)]
pub fn format_hours(minutes: i64) -> String {
    format!("{:.2}", minutes as f64 / 60.0)
}
