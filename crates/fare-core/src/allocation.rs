//! Cost allocation.
//!
//! Turns an activity, its participants, and its shared expenses into one
//! [`Contribution`] per person whose totals add up exactly to the activity
//! cost plus the shared expenses.
//!
//! # Algorithm Summary
//!
//! 1. Derive attended minutes for every person
//! 2. Split the activity cost by minutes, correcting rounding drift
//! 3. Split shared expenses under the chosen [`SplitMode`]
//! 4. Reconcile per-person totals against the grand total
//!
//! Every step is a pure function of its inputs. Nothing is cached, so the
//! same inputs always produce the same output.

use crate::participation::{
    allocate_participation_cost, total_participation_minutes, zero_shares,
};
use crate::plan::Plan;
use crate::reconcile::reconcile_contributions;
use crate::shared::allocate_shared_expense;
use crate::types::{
    Activity, AllocationSummary, Contribution, Expense, ParticipationRecord, Person, SplitMode,
    minutes_to_hours,
};
use crate::units::{MAX_AMOUNT, Units};

/// Sum of all expense amounts, or `None` if it does not fit in [`Units`].
pub fn total_shared_expense(expenses: &[Expense]) -> Option<Units> {
    expenses
        .iter()
        .try_fold(0, |total: Units, e| total.checked_add(e.amount()))
}

/// Computes each person's contribution, in `people` order.
///
/// Returns an empty list while there is nothing to split yet: no people, or
/// nobody attended any part of the window. Expenses gathered outside a
/// [`Plan`] that add up to more than [`MAX_AMOUNT`] also give an empty list.
pub fn allocate(
    activity: &Activity,
    people: &[Person],
    expenses: &[Expense],
    mode: SplitMode,
) -> Vec<Contribution> {
    let records: Vec<ParticipationRecord> = people.iter().map(ParticipationRecord::from).collect();
    if records.is_empty() || total_participation_minutes(&records) == 0 {
        tracing::debug!(people = records.len(), "not enough data to allocate");
        return Vec::new();
    }

    let total_activity_cost = activity.total_cost();
    let Some(total_shared) = total_shared_expense(expenses).filter(|t| *t <= MAX_AMOUNT) else {
        tracing::warn!(
            expenses = expenses.len(),
            "shared expenses exceed the amount limit, nothing allocated"
        );
        return Vec::new();
    };
    tracing::trace!(
        total_activity_cost,
        total_shared,
        %mode,
        people = records.len(),
        "allocating"
    );

    let mut shares = allocate_participation_cost(total_activity_cost, &records);
    if shares.is_empty() {
        // The window cost rounded down to nothing; shared expenses still apply.
        shares = zero_shares(&records);
    }

    let shared = allocate_shared_expense(total_shared, &records, mode);
    reconcile_contributions(shares, &shared, total_activity_cost + total_shared)
}

/// Allocates a plan and reports the totals alongside the contributions.
pub fn summarize(plan: &Plan) -> AllocationSummary {
    let activity = plan.activity();
    let total_activity_cost = activity.total_cost();
    let total_shared = plan.total_shared_expense();

    AllocationSummary {
        split_mode: plan.split_mode(),
        total_minutes: activity.total_minutes(),
        total_hours: minutes_to_hours(activity.total_minutes()),
        total_activity_cost,
        total_shared_expense: total_shared,
        grand_total: total_activity_cost + total_shared,
        contributions: plan.allocate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::{ActivityDraft, ExpenseDraft, PersonDraft};
    use crate::window::validate_activity;

    fn activity(start: (i64, i64), end: (i64, i64), rate: f64) -> Activity {
        validate_activity(&ActivityDraft {
            start_hour: Some(start.0),
            start_minute: Some(start.1),
            end_hour: Some(end.0),
            end_minute: Some(end.1),
            hourly_rate: Some(rate),
        })
        .expect("valid test activity")
    }

    fn person(name: &str, join: (i64, i64), leave: (i64, i64)) -> PersonDraft {
        PersonDraft {
            name: name.to_string(),
            join_hour: Some(join.0),
            join_minute: Some(join.1),
            leave_hour: Some(leave.0),
            leave_minute: Some(leave.1),
        }
    }

    fn expense(description: &str, amount: f64) -> ExpenseDraft {
        ExpenseDraft {
            description: description.to_string(),
            amount: Some(amount),
        }
    }

    fn plan(
        activity: Activity,
        people: &[PersonDraft],
        expenses: &[ExpenseDraft],
        mode: SplitMode,
    ) -> Plan {
        let mut plan = Plan::new(activity).with_split_mode(mode);
        for draft in people {
            plan = plan.with_person(draft).expect("valid test person");
        }
        for draft in expenses {
            plan = plan.with_expense(draft).expect("valid test expense");
        }
        plan
    }

    fn grand_total(contributions: &[Contribution]) -> Units {
        contributions.iter().map(|c| c.total_contribution).sum()
    }

    // Scenario: staggered arrival splits the window cost by minutes
    #[test]
    fn test_staggered_participants_split_by_minutes() {
        let plan = plan(
            activity((18, 0), (22, 0), 100_000.0),
            &[
                person("A", (18, 0), (22, 0)),
                person("B", (19, 0), (21, 0)),
            ],
            &[],
            SplitMode::Equal,
        );

        let result = plan.allocate();
        let costs: Vec<Units> = result.iter().map(|c| c.participation_cost).collect();
        assert_eq!(costs, vec![266_667, 133_333]);
        assert_eq!(grand_total(&result), 400_000);
        assert!((result[1].hours_participated - 2.0).abs() < f64::EPSILON);
    }

    // Scenario: rounding drift goes to the first participant
    #[test]
    fn test_rounding_drift_goes_to_first_participant() {
        // One hour at 100 per hour.
        let plan = plan(
            activity((9, 0), (10, 0), 100.0),
            &[
                person("A", (9, 0), (10, 0)),
                person("B", (9, 0), (10, 0)),
                person("C", (9, 0), (10, 0)),
            ],
            &[],
            SplitMode::Proportional,
        );

        let costs: Vec<Units> = plan.allocate().iter().map(|c| c.participation_cost).collect();
        assert_eq!(costs, vec![34, 33, 33]);
    }

    // Scenario: proportional shared expense
    #[test]
    fn test_proportional_shared_expense() {
        let plan = plan(
            activity((18, 0), (22, 0), 60.0),
            &[
                person("A", (18, 0), (21, 0)),
                person("B", (21, 0), (22, 0)),
            ],
            &[expense("Snacks", 600.0), expense("Drinks", 400.0)],
            SplitMode::Proportional,
        );

        let result = plan.allocate();
        let shared: Vec<Units> = result.iter().map(|c| c.shared_cost).collect();
        assert_eq!(shared, vec![750, 250]);
        assert_eq!(grand_total(&result), 240 + 1000);
    }

    // Scenario: equal-mode overshoot is corrected by reconciliation
    #[test]
    fn test_equal_mode_overshoot_is_reconciled() {
        let plan = plan(
            activity((18, 0), (20, 0), 60.0),
            &[
                person("A", (18, 0), (20, 0)),
                person("B", (18, 0), (20, 0)),
            ],
            &[expense("Court", 1001.0)],
            SplitMode::Equal,
        );

        let result = plan.allocate();
        let shared: Vec<Units> = result.iter().map(|c| c.shared_cost).collect();
        assert_eq!(shared, vec![500, 501]);
        assert_eq!(grand_total(&result), 120 + 1001);
    }

    #[test]
    fn test_zero_length_participant_pays_nothing() {
        for mode in [SplitMode::Equal, SplitMode::Proportional] {
            let plan = plan(
                activity((18, 0), (22, 0), 50_000.0),
                &[
                    person("A", (18, 0), (22, 0)),
                    person("Visitor", (20, 0), (20, 0)),
                    person("B", (19, 30), (22, 0)),
                ],
                &[expense("Water", 35_000.0)],
                mode,
            );

            let result = plan.allocate();
            assert_eq!(result[1].participation_cost, 0, "{mode}");
            assert_eq!(result[1].shared_cost, 0, "{mode}");
            assert_eq!(result[1].total_contribution, 0, "{mode}");
            assert_eq!(grand_total(&result), 200_000 + 35_000, "{mode}");
        }
    }

    #[test]
    fn test_results_follow_people_order() {
        let plan = plan(
            activity((8, 0), (12, 0), 10.0),
            &[
                person("Zed", (8, 0), (9, 0)),
                person("Amy", (8, 0), (12, 0)),
                person("Kim", (10, 0), (12, 0)),
            ],
            &[],
            SplitMode::Equal,
        );

        let names: Vec<String> = plan.allocate().into_iter().map(|c| c.person).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Kim"]);
    }

    #[test]
    fn test_conservation_and_non_negativity() {
        let people = [
            person("A", (17, 3), (23, 41)),
            person("B", (18, 0), (18, 0)),
            person("C", (17, 0), (19, 17)),
            person("D", (20, 11), (21, 0)),
            person("E", (22, 58), (23, 59)),
        ];
        let expenses = [expense("Snacks", 12_345.0), expense("Taxi", 7.0)];

        for mode in [SplitMode::Equal, SplitMode::Proportional] {
            for rate in [1.0, 7.5, 999.0, 123_456.0] {
                let plan = plan(activity((17, 0), (23, 59), rate), &people, &expenses, mode);
                let summary = plan.summarize();
                assert_eq!(
                    grand_total(&summary.contributions),
                    summary.grand_total,
                    "mode {mode}, rate {rate}"
                );
                assert!(summary.contributions.iter().all(|c| c.participation_cost >= 0
                    && c.shared_cost >= 0
                    && c.total_contribution >= 0));
            }
        }
    }

    #[test]
    fn test_allocation_is_idempotent() {
        let plan = plan(
            activity((18, 0), (22, 0), 99_999.0),
            &[
                person("A", (18, 0), (22, 0)),
                person("B", (18, 45), (21, 10)),
                person("C", (19, 5), (22, 0)),
            ],
            &[expense("Snacks", 100_001.0)],
            SplitMode::Equal,
        );

        let first = serde_json::to_string(&plan.summarize()).unwrap();
        let second = serde_json::to_string(&plan.summarize()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_huge_expenses_outside_a_plan_allocate_nothing() {
        use crate::types::ExpenseDescription;

        let activity = activity((18, 0), (22, 0), 100.0);
        let attendee = [person("A", (18, 0), (22, 0))];
        let people = plan(activity.clone(), &attendee, &[], SplitMode::Equal)
            .people()
            .to_vec();
        let expense = |amount| Expense::new(ExpenseDescription::new("Yacht").unwrap(), amount);
        let huge = vec![expense(Units::MAX), expense(Units::MAX)];

        assert_eq!(total_shared_expense(&huge), None);
        assert!(allocate(&activity, &people, &huge, SplitMode::Equal).is_empty());

        let over_limit = vec![expense(MAX_AMOUNT + 1)];
        assert_eq!(total_shared_expense(&over_limit), Some(MAX_AMOUNT + 1));
        assert!(allocate(&activity, &people, &over_limit, SplitMode::Proportional).is_empty());
    }

    #[test]
    fn test_rate_too_large_for_whole_units_is_rejected() {
        let err = validate_activity(&ActivityDraft {
            start_hour: Some(18),
            start_minute: Some(0),
            end_hour: Some(22),
            end_minute: Some(0),
            hourly_rate: Some(1e30),
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("hourly rate is out of range"), "{err}");
    }

    #[test]
    fn test_empty_without_people() {
        let activity = activity((18, 0), (22, 0), 100.0);
        assert!(allocate(&activity, &[], &[], SplitMode::Equal).is_empty());
    }

    #[test]
    fn test_empty_when_nobody_attended() {
        let plan = plan(
            activity((18, 0), (22, 0), 100.0),
            &[person("A", (19, 0), (19, 0))],
            &[expense("Snacks", 500.0)],
            SplitMode::Equal,
        );
        assert!(plan.allocate().is_empty());
    }

    #[test]
    fn test_shared_expenses_split_when_window_cost_rounds_to_zero() {
        // 10 minutes at 1 per hour rounds to 0.
        let plan = plan(
            activity((9, 0), (9, 10), 1.0),
            &[person("A", (9, 0), (9, 10)), person("B", (9, 0), (9, 10))],
            &[expense("Tea", 30.0)],
            SplitMode::Equal,
        );

        let result = plan.allocate();
        assert_eq!(result.iter().map(|c| c.participation_cost).sum::<Units>(), 0);
        assert_eq!(result.iter().map(|c| c.shared_cost).collect::<Vec<_>>(), vec![15, 15]);
    }

    #[test]
    fn test_summary_reports_totals() {
        let plan = plan(
            activity((18, 0), (22, 0), 100_000.0),
            &[
                person("A", (18, 0), (22, 0)),
                person("B", (19, 0), (21, 0)),
            ],
            &[expense("Snacks", 1001.0)],
            SplitMode::Equal,
        );

        let summary = summarize(&plan);
        assert_eq!(summary.total_minutes, 240);
        assert!((summary.total_hours - 4.0).abs() < f64::EPSILON);
        assert_eq!(summary.total_activity_cost, 400_000);
        assert_eq!(summary.total_shared_expense, 1001);
        assert_eq!(summary.grand_total, 401_001);

        insta::assert_snapshot!(serde_json::to_string_pretty(&summary.contributions).unwrap(), @r#"
        [
          {
            "person": "A",
            "minutes_participated": 240,
            "hours_participated": 4.0,
            "participation_cost": 266667,
            "shared_cost": 500,
            "total_contribution": 267167
          },
          {
            "person": "B",
            "minutes_participated": 120,
            "hours_participated": 2.0,
            "participation_cost": 133333,
            "shared_cost": 501,
            "total_contribution": 133834
          }
        ]
        "#);
    }
}
