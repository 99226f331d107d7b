//! Check command for validating a plan without splitting it.

use std::io::Write;

use anyhow::Result;
use fare_core::Plan;

use crate::commands::split::format_overview;
use crate::commands::util::format_hours;

pub fn run<W: Write>(writer: &mut W, plan: &Plan) -> Result<()> {
    writeln!(writer, "Plan OK")?;
    write!(writer, "{}", format_overview(plan))?;

    if plan.people().is_empty() {
        writeln!(writer, "People: none")?;
    } else {
        writeln!(writer, "People ({}):", plan.people().len())?;
        for person in plan.people() {
            writeln!(
                writer,
                "- {} {}-{} ({} h)",
                person.name(),
                person.join(),
                person.leave(),
                format_hours(person.minutes_participated())
            )?;
        }
    }

    if plan.expenses().is_empty() {
        writeln!(writer, "Expenses: none")?;
    } else {
        writeln!(
            writer,
            "Expenses ({}, total {}):",
            plan.expenses().len(),
            plan.total_shared_expense()
        )?;
        for expense in plan.expenses() {
            writeln!(writer, "- {}: {}", expense.description(), expense.amount())?;
        }
    }

    Ok(())
}
