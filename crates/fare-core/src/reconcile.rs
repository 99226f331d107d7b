//! Final reconciliation of per-person totals.

use crate::participation::ParticipationShare;
use crate::types::Contribution;
use crate::units::{Units, distribute_units};

/// Combines time-based and shared costs into contributions whose totals add
/// up to `expected_total`.
///
/// Any difference is settled on the shared part of participants with attended
/// time, one unit each in list order. `shared` is aligned with `shares` by
/// index; missing entries count as 0.
pub fn reconcile_contributions(
    shares: Vec<ParticipationShare>,
    shared: &[Units],
    expected_total: Units,
) -> Vec<Contribution> {
    let mut shared_costs: Vec<Units> = (0..shares.len())
        .map(|i| shared.get(i).copied().unwrap_or(0))
        .collect();

    let actual_total: Units = shares
        .iter()
        .zip(&shared_costs)
        .map(|(share, shared_cost)| share.participation_cost + shared_cost)
        .sum();

    let drift = expected_total - actual_total;
    if drift != 0 {
        tracing::debug!(
            expected_total,
            actual_total,
            drift,
            "reconciling contribution totals"
        );
        distribute_units(
            &mut shared_costs,
            |i| shares[i].minutes_participated > 0,
            drift,
        );
    }

    shares
        .into_iter()
        .zip(shared_costs)
        .map(|(share, shared_cost)| Contribution {
            total_contribution: share.participation_cost + shared_cost,
            person: share.person,
            minutes_participated: share.minutes_participated,
            hours_participated: share.hours_participated,
            participation_cost: share.participation_cost,
            shared_cost,
        })
        .collect()
}
