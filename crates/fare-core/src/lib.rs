//! Core domain logic for splitting shared activity costs.
//!
//! This crate contains:
//! - Validation: clock times, activity windows, participants, and expenses
//! - Allocation: time-based cost by attended minutes, shared expenses by
//!   split mode, and a final reconciliation so totals add up exactly
//! - Plans: immutable snapshots edited by copy-on-write

mod allocation;
pub mod participation;
mod plan;
pub mod reconcile;
pub mod shared;
pub mod types;
pub mod units;
pub mod window;

pub use allocation::{allocate, summarize, total_shared_expense};
pub use plan::Plan;
pub use types::{
    Activity, ActivityDraft, AllocationSummary, Contribution, Expense, ExpenseDescription,
    ExpenseDraft, ParticipationRecord, Person, PersonDraft, PersonName, SplitMode,
    UnknownSplitMode, ValidationError,
};
pub use units::{MAX_AMOUNT, Units};
pub use window::{ClockTime, validate_activity, window_minutes};
