//! Time-based cost allocation.
//!
//! The activity cost is split in proportion to the minutes each person
//! attended. Each share is rounded half away from zero, then the rounding
//! drift is handed back one unit at a time, first participants first, so the
//! shares add up to the activity cost exactly.

use crate::types::{ParticipationRecord, minutes_to_hours};
use crate::units::{Units, distribute_units, share_rounded};

/// One person's time-based share.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipationShare {
    pub person: String,
    pub minutes_participated: i64,
    pub hours_participated: f64,
    pub participation_cost: Units,
}

impl ParticipationShare {
    fn zero(record: &ParticipationRecord) -> Self {
        Self {
            person: record.person.clone(),
            minutes_participated: record.minutes_participated,
            hours_participated: minutes_to_hours(record.minutes_participated),
            participation_cost: 0,
        }
    }
}

/// Sum of minutes over the records that attended at all.
pub fn total_participation_minutes(records: &[ParticipationRecord]) -> i64 {
    records
        .iter()
        .filter(|r| r.is_active())
        .map(|r| r.minutes_participated)
        .sum()
}

/// Splits `total_activity_cost` across `records` by attended minutes.
///
/// Returns an empty list when there is nothing to split: no records, no
/// attended minutes, or a zero cost. Otherwise returns one share per record,
/// in input order.
pub fn allocate_participation_cost(
    total_activity_cost: Units,
    records: &[ParticipationRecord],
) -> Vec<ParticipationShare> {
    let total_minutes = total_participation_minutes(records);
    if records.is_empty() || total_minutes == 0 || total_activity_cost == 0 {
        return Vec::new();
    }

    let mut costs: Vec<Units> = records
        .iter()
        .map(|r| {
            if r.is_active() {
                share_rounded(total_activity_cost, r.minutes_participated, total_minutes)
            } else {
                0
            }
        })
        .collect();

    let drift = total_activity_cost - costs.iter().sum::<Units>();
    if drift != 0 {
        tracing::debug!(drift, "correcting participation rounding drift");
        distribute_units(&mut costs, |i| records[i].is_active(), drift);
    }

    records
        .iter()
        .zip(costs)
        .map(|(record, participation_cost)| ParticipationShare {
            participation_cost,
            ..ParticipationShare::zero(record)
        })
        .collect()
}

/// Zero-cost shares for every record, used when the activity cost rounds to nothing.
pub(crate) fn zero_shares(records: &[ParticipationRecord]) -> Vec<ParticipationShare> {
    records.iter().map(ParticipationShare::zero).collect()
}
