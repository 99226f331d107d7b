//! Shared expense allocation.
//!
//! Only active participants (those with attended minutes) pay toward shared
//! expenses. People who never attended always get 0.

use crate::participation::total_participation_minutes;
use crate::types::{ParticipationRecord, SplitMode};
use crate::units::{Units, distribute_units, round_ratio, share_floored};

/// Splits `total_shared_expense` under `mode`.
///
/// Returns one share per record, aligned with `records` by index.
///
/// `Equal` mode gives every active person the same rounded amount and does no
/// correction of its own, so its shares may miss the total by a few units.
/// The final reconciliation pass absorbs that difference.
pub fn allocate_shared_expense(
    total_shared_expense: Units,
    records: &[ParticipationRecord],
    mode: SplitMode,
) -> Vec<Units> {
    if total_shared_expense <= 0 {
        return vec![0; records.len()];
    }

    match mode {
        SplitMode::Equal => split_equal(total_shared_expense, records),
        SplitMode::Proportional => split_proportional(total_shared_expense, records),
    }
}

fn split_equal(total: Units, records: &[ParticipationRecord]) -> Vec<Units> {
    let active = records.iter().filter(|r| r.is_active()).count();
    let per_person = round_ratio(i128::from(total), i128::try_from(active).unwrap_or(0));

    records
        .iter()
        .map(|r| if r.is_active() { per_person } else { 0 })
        .collect()
}

fn split_proportional(total: Units, records: &[ParticipationRecord]) -> Vec<Units> {
    let total_minutes = total_participation_minutes(records);

    let mut shares: Vec<Units> = records
        .iter()
        .map(|r| {
            if r.is_active() {
                share_floored(total, r.minutes_participated, total_minutes)
            } else {
                0
            }
        })
        .collect();

    // Floors never overshoot, so the remainder is never negative.
    let remainder = total - shares.iter().sum::<Units>();
    if remainder > 0 {
        tracing::trace!(remainder, "handing out proportional remainder");
        distribute_units(&mut shares, |i| records[i].is_active(), remainder);
    }

    shares
}
