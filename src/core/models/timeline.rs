//! Timeline events
//!
//! The append-only audit trail of an issue. Events are never edited or
//! removed once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name recorded for scheduler-driven events
pub const SYSTEM_ACTOR: &str = "System";

/// Whether `id` would read back as [`Actor::System`] and so cannot name a user
#[must_use]
pub fn is_reserved_user_id(id: &str) -> bool {
    id.trim().eq_ignore_ascii_case(SYSTEM_ACTOR)
}

/// Kind of lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Issue was created
    Reported,
    /// Work status changed (Pending / In Progress)
    StatusChanged,
    /// Administrator marked the issue resolved
    Resolved,
    /// Resolution confirmed by the reporter or by window expiry
    Verified,
    /// Reporter disputed the resolution
    Reopened,
    /// Another user endorsed the issue
    MeToo,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reported => write!(f, "reported"),
            Self::StatusChanged => write!(f, "status_changed"),
            Self::Resolved => write!(f, "resolved"),
            Self::Verified => write!(f, "verified"),
            Self::Reopened => write!(f, "reopened"),
            Self::MeToo => write!(f, "me_too"),
        }
    }
}

/// Who caused an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Actor {
    /// A user identity
    User(String),
    /// The verification scheduler
    System,
}

impl From<String> for Actor {
    fn from(value: String) -> Self {
        if value == SYSTEM_ACTOR {
            Self::System
        } else {
            Self::User(value)
        }
    }
}

impl From<Actor> for String {
    fn from(actor: Actor) -> Self {
        match actor {
            Actor::User(id) => id,
            Actor::System => SYSTEM_ACTOR.to_string(),
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "{id}"),
            Self::System => write!(f, "{SYSTEM_ACTOR}"),
        }
    }
}

/// One immutable audit record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Issue this event belongs to
    pub issue_id: String,
    /// Event kind
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Human-readable description
    pub message: String,
    /// User identity or `System`
    pub actor: Actor,
    /// When the event happened
    pub timestamp: DateTime<Utc>,
}

impl TimelineEvent {
    /// Create a new event
    #[must_use]
    pub fn new(
        issue_id: impl Into<String>,
        kind: EventKind,
        message: impl Into<String>,
        actor: Actor,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            issue_id: issue_id.into(),
            kind,
            message: message.into(),
            actor,
            timestamp,
        }
    }
}
