//! SLA status of open issues

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::core::models::{Issue, IssueStatus};

/// Where an issue stands against its SLA deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaStatus {
    /// Two hours or more remain
    OnTrack,
    /// Less than two hours remain
    Warning,
    /// Less than one hour remains
    Urgent,
    /// Deadline has passed
    Missed,
    /// Issue is resolved; SLA no longer tracked
    Closed,
}

impl std::fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnTrack => write!(f, "on track"),
            Self::Warning => write!(f, "warning"),
            Self::Urgent => write!(f, "urgent"),
            Self::Missed => write!(f, "missed"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Classify `issue` against its SLA deadline at `now`
#[must_use]
pub fn sla_status(issue: &Issue, now: DateTime<Utc>) -> SlaStatus {
    if issue.status() == IssueStatus::Resolved {
        return SlaStatus::Closed;
    }
    let left = issue.sla_deadline - now;
    if left < TimeDelta::zero() {
        SlaStatus::Missed
    } else if left < TimeDelta::hours(1) {
        SlaStatus::Urgent
    } else if left < TimeDelta::hours(2) {
        SlaStatus::Warning
    } else {
        SlaStatus::OnTrack
    }
}
