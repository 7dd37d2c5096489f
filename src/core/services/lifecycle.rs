//! Lifecycle state machine
//!
//! Pure transition functions over [`Issue`]. Each takes the current record,
//! the caller and the current instant, and returns either the next record
//! together with the timeline event describing the change, or
//! [`Outcome::Unchanged`] for idempotent repeats. Nothing here touches a
//! store; the tracker persists what these functions decide.
//!
//! ```text
//! Pending ──set_status──▶ InProgress ──resolve──▶ Resolved(unverified)
//!    │                       ▲                     │        │
//!    └───────resolve─────────┼─────────────────────┘        │ verify
//!                            └──────── reopen ──────┘        ▼
//!                                                    Resolved(verified)
//! ```

use chrono::{DateTime, TimeDelta, Utc};

use crate::core::error::IssueError;
use crate::core::models::{
    Actor, Caller, EventKind, Issue, IssueState, IssueStatus, ReopenReason, Resolution,
    TimelineEvent,
};

/// Default length of the reporter's verification window
pub const DEFAULT_VERIFICATION_WINDOW_HOURS: u32 = 48;

/// Tunables for the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    /// Time the reporter has to confirm or dispute a resolution
    pub verification_window: TimeDelta,
}

impl LifecyclePolicy {
    /// Policy with a window of `hours`
    #[must_use]
    pub fn with_window_hours(hours: u32) -> Self {
        Self {
            verification_window: TimeDelta::hours(i64::from(hours)),
        }
    }
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self::with_window_hours(DEFAULT_VERIFICATION_WINDOW_HOURS)
    }
}

/// Result of applying a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The record changed; persist it and append the event
    Changed {
        /// Next record
        issue: Box<Issue>,
        /// Audit record for the change
        event: TimelineEvent,
    },
    /// Idempotent repeat; nothing to persist
    Unchanged,
}

impl Outcome {
    fn changed(
        issue: Issue,
        kind: EventKind,
        message: String,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Self {
        let event = TimelineEvent::new(issue.id.clone(), kind, message, actor, now);
        Self::Changed {
            issue: Box::new(issue),
            event,
        }
    }
}

/// How a verification was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode<'a> {
    /// The reporter confirmed the fix
    Reporter(&'a Caller),
    /// The scheduler found the window elapsed
    Expired,
}

fn require_admin(caller: &Caller, action: &str) -> Result<(), IssueError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(IssueError::unauthorized(&caller.id, action))
    }
}

fn require_reporter(issue: &Issue, caller: &Caller, action: &str) -> Result<(), IssueError> {
    if issue.is_reporter(&caller.id) {
        Ok(())
    } else {
        Err(IssueError::unauthorized(&caller.id, action))
    }
}

fn required_text(value: &str, field: &str) -> Result<String, IssueError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(IssueError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Move a non-resolved issue between `Pending` and `InProgress`
///
/// Administrators only. Setting the status an issue already has is a no-op.
pub fn set_status(
    issue: &Issue,
    target: IssueStatus,
    caller: &Caller,
    now: DateTime<Utc>,
) -> Result<Outcome, IssueError> {
    require_admin(caller, "change issue status")?;

    let (state, message) = match target {
        IssueStatus::Pending => (IssueState::Pending, "Issue status set to Pending"),
        IssueStatus::InProgress => (IssueState::InProgress, "Issue status changed to In Progress"),
        IssueStatus::Resolved => {
            return Err(IssueError::Validation(
                "resolving requires a resolution note; use resolve".to_string(),
            ));
        },
    };

    if issue.status() == IssueStatus::Resolved {
        return Err(IssueError::invalid_state(
            &issue.id,
            issue.status(),
            "resolved issues can only return to work through a reopen",
        ));
    }
    if issue.status() == target {
        return Ok(Outcome::Unchanged);
    }

    let mut next = issue.clone();
    next.state = state;
    Ok(Outcome::changed(
        next,
        EventKind::StatusChanged,
        message.to_string(),
        Actor::User(caller.id.clone()),
        now,
    ))
}

/// Mark an issue resolved and open the verification window
///
/// Administrators only; `note` must be non-blank.
pub fn resolve(
    issue: &Issue,
    note: &str,
    image_ref: Option<&str>,
    caller: &Caller,
    now: DateTime<Utc>,
    policy: LifecyclePolicy,
) -> Result<Outcome, IssueError> {
    require_admin(caller, "resolve issues")?;

    if issue.status() == IssueStatus::Resolved {
        return Err(IssueError::invalid_state(&issue.id, issue.status(), "already resolved"));
    }
    let note = required_text(note, "resolution note")?;

    let mut next = issue.clone();
    next.state = IssueState::Resolved(Resolution {
        resolved_at: now,
        verification_deadline: now + policy.verification_window,
        note: note.clone(),
        image_ref: image_ref.map(str::trim).filter(|s| !s.is_empty()).map(String::from),
        resolved_by: caller.id.clone(),
        verified: false,
    });

    Ok(Outcome::changed(
        next,
        EventKind::Resolved,
        format!("Issue marked as Resolved. Note: {note}"),
        Actor::User(caller.id.clone()),
        now,
    ))
}

/// Confirm a resolution
///
/// A reporter may confirm at any time during the window; the scheduler may
/// confirm only once `now` is past the deadline. Verifying an already
/// verified issue is a no-op in both modes.
pub fn verify(
    issue: &Issue,
    mode: VerifyMode<'_>,
    now: DateTime<Utc>,
) -> Result<Outcome, IssueError> {
    if let VerifyMode::Reporter(caller) = mode {
        require_reporter(issue, caller, "verify this resolution")?;
    }

    let Some(resolution) = issue.resolution() else {
        return Err(IssueError::invalid_state(&issue.id, issue.status(), "nothing to verify"));
    };
    if resolution.verified {
        return Ok(Outcome::Unchanged);
    }

    let (message, actor) = match mode {
        VerifyMode::Reporter(caller) => (
            "Issue verified as resolved by reporter",
            Actor::User(caller.id.clone()),
        ),
        VerifyMode::Expired => {
            if now <= resolution.verification_deadline {
                return Err(IssueError::invalid_state(
                    &issue.id,
                    issue.status(),
                    "verification window still open",
                ));
            }
            ("Issue auto-verified (verification window expired)", Actor::System)
        },
    };

    let mut next = issue.clone();
    if let IssueState::Resolved(resolution) = &mut next.state {
        resolution.verified = true;
    }
    Ok(Outcome::changed(next, EventKind::Verified, message.to_string(), actor, now))
}

/// Dispute a resolution and send the issue back to work
///
/// Only the reporter may reopen, only while the resolution is unverified,
/// and both reason fields are required. Priority rises one level.
pub fn reopen(
    issue: &Issue,
    category: &str,
    text: &str,
    caller: &Caller,
    now: DateTime<Utc>,
) -> Result<Outcome, IssueError> {
    require_reporter(issue, caller, "reopen this issue")?;

    match issue.resolution() {
        None => {
            return Err(IssueError::invalid_state(
                &issue.id,
                issue.status(),
                "only resolved issues can be reopened",
            ));
        },
        Some(resolution) if resolution.verified => {
            return Err(IssueError::invalid_state(
                &issue.id,
                issue.status(),
                "resolution already verified",
            ));
        },
        Some(_) => {},
    }

    let category = required_text(category, "reopen reason category")?;
    let text = required_text(text, "reopen reason")?;

    let mut next = issue.clone();
    next.state = IssueState::InProgress;
    next.priority = issue.priority.escalated();
    next.reopen_reason = Some(ReopenReason {
        category: category.clone(),
        text: text.clone(),
        reopened_at: now,
        reopened_by: caller.id.clone(),
    });

    Ok(Outcome::changed(
        next,
        EventKind::Reopened,
        format!("Issue reopened: {category} - {text}"),
        Actor::User(caller.id.clone()),
        now,
    ))
}
