//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::{MAX_AMOUNT, Units};
use crate::window::{ClockTime, window_minutes};

/// Validation errors for caller input.
///
/// Every variant rejects a whole operation; nothing is partially applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was missing or blank.
    #[error("{field} is required")]
    IncompleteInput { field: &'static str },

    /// A time or amount fell outside its allowed range.
    #[error("{field} is out of range: {detail}")]
    InvalidRange { field: &'static str, detail: String },

    /// The activity ends at or before its start.
    #[error("end time {end} must be after start time {start}")]
    NonPositiveDuration { start: ClockTime, end: ClockTime },

    /// The hourly rate was zero, negative, or not a number.
    #[error("hourly rate must be greater than 0")]
    NonPositiveRate,

    /// A participant with the same name already exists.
    #[error("participant {name} already exists")]
    DuplicateName { name: String },

    /// An expense amount was missing or not greater than zero.
    #[error("expense amount must be greater than 0")]
    NonPositiveAmount,

    /// A removal target does not exist.
    #[error("no {what} matches {key}")]
    NotFound { what: &'static str, key: String },
}

/// Generates a trimmed, non-empty label newtype.
macro_rules! define_label {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a label from trimmed input, rejecting blank strings.
            pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
                let value = value.as_ref().trim();
                if value.is_empty() {
                    return Err(ValidationError::IncompleteInput { field: $field_name });
                }
                Ok(Self(value.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(label: $name) -> Self {
                label.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_label!(
    /// A participant's display name. Unique within a plan.
    PersonName, "name"
);

define_label!(
    /// What a shared expense was for.
    ExpenseDescription, "description"
);

/// How shared expenses are divided among active participants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Every active participant pays the same rounded amount.
    #[default]
    Equal,
    /// Participants pay in proportion to their minutes.
    Proportional,
}

impl SplitMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Proportional => "proportional",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SplitMode {
    type Err = UnknownSplitMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "proportional" => Ok(Self::Proportional),
            _ => Err(UnknownSplitMode(s.to_string())),
        }
    }
}

/// Error type for unknown split mode strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown split mode: {0} (expected equal or proportional)")]
pub struct UnknownSplitMode(String);

/// The activity window and its hourly rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    start: ClockTime,
    end: ClockTime,
    hourly_rate: f64,
}

impl Activity {
    /// Creates an activity with a positive duration and a positive, finite rate.
    ///
    /// The rate is also rejected when the window's cost would exceed
    /// [`MAX_AMOUNT`].
    #[allow(clippy::cast_precision_loss)]
    pub fn new(
        start: ClockTime,
        end: ClockTime,
        hourly_rate: f64,
    ) -> Result<Self, ValidationError> {
        let minutes = window_minutes(start, end);
        if minutes == 0 {
            return Err(ValidationError::NonPositiveDuration { start, end });
        }
        if !hourly_rate.is_finite() || hourly_rate <= 0.0 {
            return Err(ValidationError::NonPositiveRate);
        }
        let cost = window_cost(minutes, hourly_rate);
        if cost > MAX_AMOUNT as f64 {
            return Err(ValidationError::InvalidRange {
                field: "hourly rate",
                detail: format!("activity cost {cost} exceeds the limit of {MAX_AMOUNT}"),
            });
        }
        Ok(Self {
            start,
            end,
            hourly_rate,
        })
    }

    pub const fn start(&self) -> ClockTime {
        self.start
    }

    pub const fn end(&self) -> ClockTime {
        self.end
    }

    pub const fn hourly_rate(&self) -> f64 {
        self.hourly_rate
    }

    /// Length of the activity in minutes. Always positive.
    pub fn total_minutes(&self) -> i64 {
        window_minutes(self.start, self.end)
    }

    /// Total time-based cost: `round(minutes * rate / 60)` in whole units.
    ///
    /// Never above [`MAX_AMOUNT`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn total_cost(&self) -> Units {
        window_cost(self.total_minutes(), self.hourly_rate) as Units
    }

    /// Whether `time` lies inside the window, inclusive at both ends.
    pub fn contains(&self, time: ClockTime) -> bool {
        (self.start..=self.end).contains(&time)
    }
}

#[allow(clippy::cast_precision_loss)]
fn window_cost(minutes: i64, hourly_rate: f64) -> f64 {
    (minutes as f64 * (hourly_rate / 60.0)).round()
}

/// A participant and the part of the window they attended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    name: PersonName,
    join: ClockTime,
    leave: ClockTime,
}

impl Person {
    pub(crate) const fn new(name: PersonName, join: ClockTime, leave: ClockTime) -> Self {
        Self { name, join, leave }
    }

    pub const fn name(&self) -> &PersonName {
        &self.name
    }

    pub const fn join(&self) -> ClockTime {
        self.join
    }

    pub const fn leave(&self) -> ClockTime {
        self.leave
    }

    /// Minutes attended, never negative.
    pub fn minutes_participated(&self) -> i64 {
        (self.leave.minute_of_day() - self.join.minute_of_day()).max(0)
    }
}

/// A flat group expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    description: ExpenseDescription,
    amount: Units,
}

impl Expense {
    pub(crate) const fn new(description: ExpenseDescription, amount: Units) -> Self {
        Self {
            description,
            amount,
        }
    }

    pub const fn description(&self) -> &ExpenseDescription {
        &self.description
    }

    pub const fn amount(&self) -> Units {
        self.amount
    }
}

/// Raw activity input, as typed into a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityDraft {
    pub start_hour: Option<i64>,
    pub start_minute: Option<i64>,
    pub end_hour: Option<i64>,
    pub end_minute: Option<i64>,
    pub hourly_rate: Option<f64>,
}

/// Raw participant input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub join_hour: Option<i64>,
    pub join_minute: Option<i64>,
    pub leave_hour: Option<i64>,
    pub leave_minute: Option<i64>,
}

/// Raw expense input. Decimal amounts are rounded to whole units on acceptance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Option<f64>,
}

/// A person's attended minutes, derived fresh for each allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationRecord {
    pub person: String,
    pub minutes_participated: i64,
}

impl ParticipationRecord {
    /// Whether this record takes part in cost sharing.
    pub const fn is_active(&self) -> bool {
        self.minutes_participated > 0
    }
}

impl From<&Person> for ParticipationRecord {
    fn from(person: &Person) -> Self {
        Self {
            person: person.name.to_string(),
            minutes_participated: person.minutes_participated(),
        }
    }
}

/// One person's final share of the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub person: String,
    pub minutes_participated: i64,
    pub hours_participated: f64,
    pub participation_cost: Units,
    pub shared_cost: Units,
    pub total_contribution: Units,
}

/// Allocation results together with the totals they reconcile against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub split_mode: SplitMode,
    pub total_minutes: i64,
    pub total_hours: f64,
    pub total_activity_cost: Units,
    pub total_shared_expense: Units,
    pub grand_total: Units,
    pub contributions: Vec<Contribution>,
}

/// Converts minutes to fractional hours.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn minutes_to_hours(minutes: i64) -> f64 {
    minutes as f64 / 60.0
}
