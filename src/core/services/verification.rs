//! Verification window selection
//!
//! Which resolved issues the scheduler should auto-verify, and how much of
//! the window a reporter has left.

use chrono::{DateTime, Utc};

use crate::core::models::Issue;

/// Whether `issue` is resolved, unverified, and past its verification deadline
#[must_use]
pub fn is_due(issue: &Issue, now: DateTime<Utc>) -> bool {
    issue
        .resolution()
        .is_some_and(|r| !r.verified && now > r.verification_deadline)
}

/// Ids of the issues due for auto-verification
#[must_use]
pub fn due_for_verification(issues: &[Issue], now: DateTime<Utc>) -> Vec<String> {
    issues.iter().filter(|i| is_due(i, now)).map(|i| i.id.clone()).collect()
}

/// Whole hours left in the reporter's window
///
/// `None` when the issue is not awaiting verification; `Some(0)` once the
/// window has elapsed but the sweep has not run yet.
#[must_use]
pub fn hours_left(issue: &Issue, now: DateTime<Utc>) -> Option<i64> {
    let resolution = issue.resolution().filter(|r| !r.verified)?;
    Some((resolution.verification_deadline - now).num_hours().max(0))
}
