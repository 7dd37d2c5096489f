//! Issue model
//!
//! An issue moves `Pending -> InProgress -> Resolved`. Verification and
//! reopening are not separate statuses: verification is a flag on the
//! resolution record, and reopening drops the resolution and returns the
//! issue to `InProgress`.
//!
//! The resolution data lives inside [`IssueState::Resolved`], so
//! "resolved implies resolvedAt and a verification deadline" and
//! "not resolved implies no resolution fields" hold by construction.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::Priority;

/// Who can see an issue in the public feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Listed in the campus feed and open to endorsements
    #[default]
    Public,
    /// Visible to the reporter and administrators only
    Private,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(format!("Invalid visibility: {s}. Use: public, private")),
        }
    }
}

/// Flat status value, derived from [`IssueState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Reported, nobody working on it yet
    Pending,
    /// Work underway (also the state after a reopen)
    InProgress,
    /// Fixed, possibly awaiting verification
    Resolved,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Resolved => write!(f, "Resolved"),
        }
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "inprogress" | "started" => Ok(Self::InProgress),
            "resolved" | "done" => Ok(Self::Resolved),
            _ => Err(format!("Invalid status: {s}. Use: pending, in_progress, resolved")),
        }
    }
}

/// Resolution details, present only while an issue is resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// When the issue entered `Resolved`
    pub resolved_at: DateTime<Utc>,
    /// End of the reporter's verification window
    pub verification_deadline: DateTime<Utc>,
    /// What was done
    pub note: String,
    /// Optional proof image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// Administrator who resolved it
    pub resolved_by: String,
    /// Confirmed by the reporter or by window expiry
    #[serde(default)]
    pub verified: bool,
}

/// Lifecycle state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IssueState {
    /// Reported, nobody working on it yet
    #[default]
    Pending,
    /// Work underway
    InProgress,
    /// Fixed
    Resolved(Resolution),
}

impl IssueState {
    /// The flat status value
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        match self {
            Self::Pending => IssueStatus::Pending,
            Self::InProgress => IssueStatus::InProgress,
            Self::Resolved(_) => IssueStatus::Resolved,
        }
    }
}

/// Why the reporter disputed a resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReopenReason {
    /// Reason category, e.g. "Issue Not Fixed"
    pub category: String,
    /// Free-text explanation
    pub text: String,
    /// When the reopen happened
    pub reopened_at: DateTime<Utc>,
    /// Who reopened (always the reporter)
    pub reopened_by: String,
}

/// Fields supplied by the reporter when filing an issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    /// Short title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Category such as "Electrical" or "Plumbing"
    pub category: String,
    /// Building / room
    #[serde(default)]
    pub location: String,
    /// Feed visibility
    #[serde(default)]
    pub visibility: Visibility,
    /// Optional photo reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

/// A campus facility issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Store-assigned identifier (empty until created)
    #[serde(default)]
    pub id: String,
    /// Short title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Category
    pub category: String,
    /// Building / room
    #[serde(default)]
    pub location: String,
    /// Feed visibility
    #[serde(default)]
    pub visibility: Visibility,
    /// Optional photo reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// Identity of the original reporter
    pub reporter_id: String,
    /// Lifecycle state
    pub state: IssueState,
    /// Current priority
    pub priority: Priority,
    /// Users who reported or endorsed this issue (reporter included)
    pub affected_users: BTreeSet<String>,
    /// SLA duration fixed at creation
    pub sla_hours: u32,
    /// `created_at + sla_hours`, fixed at creation
    pub sla_deadline: DateTime<Utc>,
    /// Creation instant
    pub created_at: DateTime<Utc>,
    /// Most recent reopen, overwritten on each reopen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reopen_reason: Option<ReopenReason>,
    /// Store revision used for compare-and-swap updates
    #[serde(default)]
    pub revision: u64,
}

impl Issue {
    /// Build a fresh `Pending` issue with its reporter as the first affected user
    #[must_use]
    pub fn new(
        new: NewIssue,
        reporter_id: impl Into<String>,
        priority: Priority,
        sla_hours: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        let reporter_id = reporter_id.into();
        let mut affected_users = BTreeSet::new();
        affected_users.insert(reporter_id.clone());

        Self {
            id: String::new(),
            title: new.title,
            description: new.description,
            category: new.category,
            location: new.location,
            visibility: new.visibility,
            image_ref: new.image_ref,
            reporter_id,
            state: IssueState::Pending,
            priority,
            affected_users,
            sla_hours,
            sla_deadline: created_at + TimeDelta::hours(i64::from(sla_hours)),
            created_at,
            reopen_reason: None,
            revision: 0,
        }
    }

    /// Flat status
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        self.state.status()
    }

    /// Resolution details, if resolved
    #[must_use]
    pub const fn resolution(&self) -> Option<&Resolution> {
        match &self.state {
            IssueState::Resolved(resolution) => Some(resolution),
            _ => None,
        }
    }

    /// Whether the resolution has been confirmed
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.resolution().is_some_and(|r| r.verified)
    }

    /// When the issue was resolved
    #[must_use]
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolution().map(|r| r.resolved_at)
    }

    /// End of the verification window
    #[must_use]
    pub fn verification_deadline(&self) -> Option<DateTime<Utc>> {
        self.resolution().map(|r| r.verification_deadline)
    }

    /// Number of distinct affected users
    #[must_use]
    pub fn affected_count(&self) -> usize {
        self.affected_users.len()
    }

    /// Whether `user_id` filed this issue
    #[must_use]
    pub fn is_reporter(&self, user_id: &str) -> bool {
        self.reporter_id == user_id
    }

    /// Short reporter-facing reference, e.g. `SR-ISS-12`
    #[must_use]
    pub fn display_id(&self) -> String {
        let id = self.id.strip_prefix("issue_").unwrap_or(&self.id);
        let short: String = id.chars().take(8).collect();
        format!("SR-{short}")
    }

    /// Check the invariants a store must refuse to persist without
    pub fn validate(&self) -> Result<(), String> {
        if self.reporter_id.is_empty() {
            return Err("issue has no reporter".to_string());
        }
        if !self.affected_users.contains(&self.reporter_id) {
            return Err(format!("reporter {} missing from affected users", self.reporter_id));
        }
        let expected = self.created_at + TimeDelta::hours(i64::from(self.sla_hours));
        if self.sla_deadline != expected {
            return Err(format!(
                "sla deadline {} does not match created_at + {}h",
                self.sla_deadline.to_rfc3339(),
                self.sla_hours
            ));
        }
        Ok(())
    }
}
