//! An immutable snapshot of everything an allocation needs.
//!
//! A [`Plan`] is never changed in place. Each `with_*`/`without_*` call
//! validates its input first and then returns a new plan, so a rejected edit
//! leaves the previous plan exactly as it was.

use serde::Serialize;

use crate::allocation;
use crate::types::{
    Activity, ActivityDraft, AllocationSummary, Contribution, Expense, ExpenseDescription,
    ExpenseDraft, Person, PersonDraft, PersonName, SplitMode, ValidationError,
};
use crate::units::{MAX_AMOUNT, Units};
use crate::window::{ClockTime, validate_activity};

/// An activity with its participants, shared expenses, and split mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    activity: Activity,
    people: Vec<Person>,
    expenses: Vec<Expense>,
    split_mode: SplitMode,
    /// Running sum of `expenses`, kept within [`MAX_AMOUNT`].
    #[serde(skip)]
    shared_total: Units,
}

impl Plan {
    /// Creates an empty plan for `activity` using the default split mode.
    pub fn new(activity: Activity) -> Self {
        Self {
            activity,
            people: Vec::new(),
            expenses: Vec::new(),
            split_mode: SplitMode::default(),
            shared_total: 0,
        }
    }

    /// Builds a plan from raw input, failing on the first invalid entry.
    pub fn from_drafts(
        activity: &ActivityDraft,
        people: &[PersonDraft],
        expenses: &[ExpenseDraft],
        split_mode: SplitMode,
    ) -> Result<Self, ValidationError> {
        let mut plan = Self::new(validate_activity(activity)?).with_split_mode(split_mode);
        for draft in people {
            plan = plan.with_person(draft)?;
        }
        for draft in expenses {
            plan = plan.with_expense(draft)?;
        }
        Ok(plan)
    }

    pub const fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub const fn split_mode(&self) -> SplitMode {
        self.split_mode
    }

    pub const fn total_shared_expense(&self) -> Units {
        self.shared_total
    }

    /// Replaces the activity window and rate.
    ///
    /// Rejected if any current participant would fall outside the new window.
    pub fn with_activity(&self, draft: &ActivityDraft) -> Result<Self, ValidationError> {
        let activity = validate_activity(draft)?;
        if let Some(person) = self
            .people
            .iter()
            .find(|p| !activity.contains(p.join()) || !activity.contains(p.leave()))
        {
            return Err(ValidationError::InvalidRange {
                field: "activity window",
                detail: format!(
                    "{} ({}-{}) falls outside {}-{}",
                    person.name(),
                    person.join(),
                    person.leave(),
                    activity.start(),
                    activity.end()
                ),
            });
        }

        Ok(Self {
            activity,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn with_split_mode(&self, split_mode: SplitMode) -> Self {
        Self {
            split_mode,
            ..self.clone()
        }
    }

    /// Adds a participant after checking the name and their times.
    pub fn with_person(&self, draft: &PersonDraft) -> Result<Self, ValidationError> {
        let person = validate_person(draft, &self.activity, &self.people)?;
        tracing::debug!(name = %person.name(), "adding participant");

        let mut people = self.people.clone();
        people.push(person);
        Ok(Self {
            people,
            ..self.clone()
        })
    }

    /// Removes the participant at `index`.
    pub fn without_person(&self, index: usize) -> Result<Self, ValidationError> {
        if index >= self.people.len() {
            return Err(ValidationError::NotFound {
                what: "participant",
                key: format!("index {index}"),
            });
        }

        let people = without_index(&self.people, index);
        Ok(Self {
            people,
            ..self.clone()
        })
    }

    /// Removes the participant called `name`.
    pub fn without_person_named(&self, name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        let index = self
            .people
            .iter()
            .position(|p| p.name().as_str() == name)
            .ok_or_else(|| ValidationError::NotFound {
                what: "participant",
                key: name.to_string(),
            })?;
        self.without_person(index)
    }

    /// Adds a shared expense.
    ///
    /// Rejected if the expense total would exceed [`MAX_AMOUNT`].
    pub fn with_expense(&self, draft: &ExpenseDraft) -> Result<Self, ValidationError> {
        let expense = validate_expense(draft)?;
        let shared_total = self
            .shared_total
            .checked_add(expense.amount())
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or_else(|| ValidationError::InvalidRange {
                field: "shared expenses",
                detail: format!(
                    "{} plus {} exceeds the limit of {MAX_AMOUNT}",
                    self.shared_total,
                    expense.amount()
                ),
            })?;
        tracing::debug!(
            description = %expense.description(),
            amount = expense.amount(),
            "adding expense"
        );

        let mut expenses = self.expenses.clone();
        expenses.push(expense);
        Ok(Self {
            expenses,
            shared_total,
            ..self.clone()
        })
    }

    /// Removes the expense at `index`.
    pub fn without_expense(&self, index: usize) -> Result<Self, ValidationError> {
        if index >= self.expenses.len() {
            return Err(ValidationError::NotFound {
                what: "expense",
                key: format!("index {index}"),
            });
        }

        let shared_total = self.shared_total - self.expenses[index].amount();
        let expenses = without_index(&self.expenses, index);
        Ok(Self {
            expenses,
            shared_total,
            ..self.clone()
        })
    }

    /// Allocates this plan. See [`allocation::allocate`].
    pub fn allocate(&self) -> Vec<Contribution> {
        allocation::allocate(&self.activity, &self.people, &self.expenses, self.split_mode)
    }

    /// Allocates this plan and reports its totals. See [`allocation::summarize`].
    pub fn summarize(&self) -> AllocationSummary {
        allocation::summarize(self)
    }
}

fn without_index<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Validates a participant against the activity window and existing names.
fn validate_person(
    draft: &PersonDraft,
    activity: &Activity,
    existing: &[Person],
) -> Result<Person, ValidationError> {
    let name = PersonName::new(&draft.name)?;
    if existing.iter().any(|p| p.name() == &name) {
        return Err(ValidationError::DuplicateName {
            name: name.to_string(),
        });
    }

    let join = ClockTime::from_parts(draft.join_hour, draft.join_minute, "join time")?;
    let leave = ClockTime::from_parts(draft.leave_hour, draft.leave_minute, "leave time")?;
    let (start, end) = (activity.start(), activity.end());

    if join < start {
        return Err(out_of_window("join time", join, "before activity start", start));
    }
    if join > end {
        return Err(out_of_window("join time", join, "after activity end", end));
    }
    if leave < join {
        return Err(out_of_window("leave time", leave, "before join time", join));
    }
    if leave > end {
        return Err(out_of_window("leave time", leave, "after activity end", end));
    }

    Ok(Person::new(name, join, leave))
}

fn out_of_window(
    field: &'static str,
    time: ClockTime,
    relation: &str,
    bound: ClockTime,
) -> ValidationError {
    ValidationError::InvalidRange {
        field,
        detail: format!("{time} is {relation} {bound}"),
    }
}

/// Validates an expense, rounding its amount to whole units.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn validate_expense(draft: &ExpenseDraft) -> Result<Expense, ValidationError> {
    let description = ExpenseDescription::new(&draft.description)?;
    let amount = draft
        .amount
        .filter(|a| a.is_finite())
        .map(f64::round)
        .filter(|a| *a >= 1.0)
        .ok_or(ValidationError::NonPositiveAmount)?;
    if amount > MAX_AMOUNT as f64 {
        return Err(ValidationError::InvalidRange {
            field: "amount",
            detail: format!("{amount} exceeds the limit of {MAX_AMOUNT}"),
        });
    }

    Ok(Expense::new(description, amount as Units))
}
