//! Property-based tests for the lifecycle engine
//!
//! Random operation sequences, driven by random callers and clock jumps,
//! must never break the record invariants.

use campusfix::core::models::{Caller, IssueStatus};
use campusfix::core::services::{crowd_priority, derive_priority, sla_hours_for};
use chrono::TimeDelta;
use proptest::prelude::*;

use crate::common::fixtures::{Harness, NewIssueBuilder, admin, reporter};

#[derive(Debug, Clone)]
enum Op {
    Status(IssueStatus),
    Resolve,
    Verify,
    AutoVerify,
    Reopen,
    MeToo(u8),
    StrangerReopen,
    Advance(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Status(IssueStatus::Pending)),
        Just(Op::Status(IssueStatus::InProgress)),
        Just(Op::Status(IssueStatus::Resolved)),
        Just(Op::Resolve),
        Just(Op::Verify),
        Just(Op::AutoVerify),
        Just(Op::Reopen),
        (0u8..30).prop_map(Op::MeToo),
        Just(Op::StrangerReopen),
        (1i64..72).prop_map(Op::Advance),
    ]
}

proptest! {
    /// Any sequence of operations keeps the stored record consistent
    #[test]
    fn operation_sequences_preserve_invariants(ops in prop::collection::vec(op(), 1..40)) {
        let h = Harness::new();
        let created = h.report(NewIssueBuilder::new().build());
        let id = created.id.clone();
        let mut changes = 1;
        let mut last_priority = created.priority;

        for op in ops {
            let result = match op {
                Op::Status(status) => h.tracker.set_status(&id, status, &admin()),
                Op::Resolve => h.tracker.resolve(&id, "Fixed", None, &admin()),
                Op::Verify => h.tracker.verify(&id, &reporter()),
                Op::AutoVerify => h.tracker.auto_verify(&id),
                Op::Reopen => h.tracker.reopen(&id, "Issue Not Fixed", "Still broken", &reporter()),
                Op::MeToo(n) => {
                    h.tracker.add_affected(&id, &Caller::member(format!("user{n}@campus.edu")))
                },
                Op::StrangerReopen => {
                    let stranger = Caller::member("stranger@campus.edu");
                    h.tracker.reopen(&id, "Issue Not Fixed", "Not mine", &stranger)
                },
                Op::Advance(hours) => {
                    h.clock.advance(TimeDelta::hours(hours));
                    continue;
                },
            };
            if let Ok(mutation) = result {
                if mutation.changed {
                    changes += 1;
                }
            }

            let issue = h.stored(&id);
            prop_assert!(issue.validate().is_ok());
            prop_assert!(issue.affected_users.contains(&issue.reporter_id));
            prop_assert_eq!(issue.sla_hours, created.sla_hours);
            prop_assert_eq!(issue.sla_deadline, created.sla_deadline);
            prop_assert!(issue.priority >= last_priority);
            if issue.is_verified() {
                prop_assert_eq!(issue.status(), IssueStatus::Resolved);
            }
            match issue.resolution() {
                Some(r) => prop_assert!(r.verification_deadline > r.resolved_at),
                None => prop_assert!(issue.status() != IssueStatus::Resolved),
            }
            prop_assert_eq!(h.events(&id).len(), changes);
            last_priority = issue.priority;
        }
    }

    /// Priority derivation is total and the SLA always follows it
    #[test]
    fn derived_priority_has_matching_sla(category in ".{0,20}", description in ".{0,80}") {
        let priority = derive_priority(&category, &description);
        prop_assert!([2, 6, 24, 48].contains(&sla_hours_for(priority)));
    }

    /// Crowd escalation never lowers a priority
    #[test]
    fn crowd_priority_never_decreases(count in 0usize..200, extra in 0usize..200) {
        let low = crowd_priority(count, derive_priority("Furniture", "chair"));
        let high = crowd_priority(count + extra, low);
        prop_assert!(high >= low);
    }
}
