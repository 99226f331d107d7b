//! JSON plan files.
//!
//! A plan file holds the raw input for one activity. Everything in it is
//! validated through `fare_core::Plan`, one entry at a time, so an error
//! names the entry that caused it.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use fare_core::{ActivityDraft, ExpenseDraft, PersonDraft, Plan, SplitMode};

use crate::commands::util::parse_optional_clock;

/// On-disk plan layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    pub activity: ActivityEntry,
    #[serde(default)]
    pub people: Vec<PersonEntry>,
    #[serde(default)]
    pub expenses: Vec<ExpenseEntry>,
    #[serde(default)]
    pub split_mode: Option<SplitMode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityEntry {
    pub start: Option<String>,
    pub end: Option<String>,
    pub hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonEntry {
    #[serde(default)]
    pub name: String,
    pub join: Option<String>,
    pub leave: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseEntry {
    #[serde(default)]
    pub description: String,
    pub amount: Option<f64>,
}

impl PlanFile {
    /// Reads and parses a plan file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read plan file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid plan file {}", path.display()))
    }

    /// Parses plan file contents.
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse plan JSON")
    }

    /// Validates the file into a [`Plan`].
    ///
    /// The split mode is `mode_override` if given, then the file's own
    /// `split_mode`, then `default_mode`.
    pub fn into_plan(
        self,
        mode_override: Option<SplitMode>,
        default_mode: SplitMode,
    ) -> Result<Plan> {
        let split_mode = mode_override.or(self.split_mode).unwrap_or(default_mode);

        let activity = self.activity.to_draft().context("invalid activity")?;
        let activity = fare_core::validate_activity(&activity).context("invalid activity")?;
        let mut plan = Plan::new(activity).with_split_mode(split_mode);

        for (index, entry) in self.people.iter().enumerate() {
            let label = || format!("invalid participant #{} ({:?})", index + 1, entry.name.trim());
            let draft = entry.to_draft().with_context(label)?;
            plan = plan.with_person(&draft).with_context(label)?;
        }

        for (index, entry) in self.expenses.iter().enumerate() {
            let label = || {
                format!(
                    "invalid expense #{} ({:?})",
                    index + 1,
                    entry.description.trim()
                )
            };
            plan = plan.with_expense(&entry.to_draft()).with_context(label)?;
        }

        tracing::debug!(
            people = plan.people().len(),
            expenses = plan.expenses().len(),
            %split_mode,
            "loaded plan"
        );
        Ok(plan)
    }
}

impl ActivityEntry {
    fn to_draft(&self) -> Result<ActivityDraft> {
        let (start_hour, start_minute) =
            parse_optional_clock(self.start.as_deref()).context("invalid start time")?;
        let (end_hour, end_minute) =
            parse_optional_clock(self.end.as_deref()).context("invalid end time")?;
        Ok(ActivityDraft {
            start_hour,
            start_minute,
            end_hour,
            end_minute,
            hourly_rate: self.hourly_rate,
        })
    }
}

impl PersonEntry {
    fn to_draft(&self) -> Result<PersonDraft> {
        let (join_hour, join_minute) =
            parse_optional_clock(self.join.as_deref()).context("invalid join time")?;
        let (leave_hour, leave_minute) =
            parse_optional_clock(self.leave.as_deref()).context("invalid leave time")?;
        Ok(PersonDraft {
            name: self.name.clone(),
            join_hour,
            join_minute,
            leave_hour,
            leave_minute,
        })
    }
}

impl ExpenseEntry {
    fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            description: self.description.clone(),
            amount: self.amount,
        }
    }
}

/// Reads a plan file and validates it in one step.
pub fn load(
    path: &Path,
    mode_override: Option<SplitMode>,
    default_mode: SplitMode,
) -> Result<Plan> {
    PlanFile::read(path)?
        .into_plan(mode_override, default_mode)
        .with_context(|| format!("invalid plan in {}", path.display()))
}
