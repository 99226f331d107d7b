//! Split command: compute and print each person's contribution.
//!
//! Text output is a fixed-width table. Amounts are printed as plain integers;
//! no thousand separators or currency labels.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use fare_core::{AllocationSummary, Plan};

use crate::commands::util::format_hours;

const HEADERS: [&str; 5] = ["Name", "Hours", "Time cost", "Shared", "Total"];

pub fn run<W: Write>(writer: &mut W, plan: &Plan, json: bool) -> Result<()> {
    let summary = plan.summarize();
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        write!(writer, "{}", format_summary(plan, &summary))?;
    }
    Ok(())
}

/// Renders the header block shared by `split` and `check`.
pub fn format_overview(plan: &Plan) -> String {
    let activity = plan.activity();
    let mut output = String::new();
    writeln!(
        output,
        "Window: {}-{} ({} h) at {}/h",
        activity.start(),
        activity.end(),
        format_hours(activity.total_minutes()),
        activity.hourly_rate()
    )
    .unwrap();
    writeln!(output, "Activity cost: {}", activity.total_cost()).unwrap();
    writeln!(output, "Split mode: {}", plan.split_mode()).unwrap();
    output
}

/// Renders a summary as a human-readable report.
pub fn format_summary(plan: &Plan, summary: &AllocationSummary) -> String {
    let mut output = format_overview(plan);
    writeln!(output, "Shared expenses: {}", summary.total_shared_expense).unwrap();
    writeln!(output, "Grand total: {}", summary.grand_total).unwrap();
    output.push('\n');

    if summary.contributions.is_empty() {
        output.push_str("Not enough data to split yet.\n");
        return output;
    }

    let rows: Vec<[String; 5]> = summary
        .contributions
        .iter()
        .map(|c| {
            [
                c.person.clone(),
                format_hours(c.minutes_participated),
                c.participation_cost.to_string(),
                c.shared_cost.to_string(),
                c.total_contribution.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = HEADERS.map(str::to_string);
    for row in std::iter::once(&header).chain(&rows) {
        write!(output, "{:<width$}", row[0], width = widths[0]).unwrap();
        for (cell, width) in row.iter().zip(widths).skip(1) {
            write!(output, "  {cell:>width$}").unwrap();
        }
        output.push('\n');
    }

    output
}
