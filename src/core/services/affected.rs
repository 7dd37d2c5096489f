//! Affected-count tracking ("me too")
//!
//! Each distinct user counts once. Reaching a crowd threshold raises the
//! priority; see [`crowd_priority`] for the escalation table.

use chrono::{DateTime, Utc};

use super::lifecycle::Outcome;
use super::priority::crowd_priority;
use crate::core::error::IssueError;
use crate::core::models::{Actor, EventKind, Issue, TimelineEvent, is_reserved_user_id};

/// Record `user_id` as affected by `issue`
///
/// Returns [`Outcome::Unchanged`] when the user is already recorded.
pub fn add_affected(
    issue: &Issue,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Outcome, IssueError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(IssueError::Validation("user id is required".to_string()));
    }
    if is_reserved_user_id(user_id) {
        return Err(IssueError::Validation(format!("user id {user_id} is reserved")));
    }
    if issue.affected_users.contains(user_id) {
        return Ok(Outcome::Unchanged);
    }

    let mut next = issue.clone();
    next.affected_users.insert(user_id.to_string());
    let count = next.affected_count();
    next.priority = crowd_priority(count, issue.priority);

    let mut message = format!("{user_id} is also affected ({count} total)");
    if next.priority != issue.priority {
        message.push_str(&format!("; priority raised to {}", next.priority));
    }

    let event = TimelineEvent::new(
        next.id.clone(),
        EventKind::MeToo,
        message,
        Actor::User(user_id.to_string()),
        now,
    );
    Ok(Outcome::Changed {
        issue: Box::new(next),
        event,
    })
}
