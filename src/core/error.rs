//! Error types for the lifecycle engine

use thiserror::Error;

use super::models::{EventKind, IssueStatus};

/// Failures reported by store ports
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this id
    #[error("record not found: {0}")]
    NotFound(String),

    /// Compare-and-swap rejected: someone else wrote first
    #[error("revision conflict on {id}: expected {expected}, found {found}")]
    Conflict {
        /// Record id
        id: String,
        /// Revision the writer read
        expected: u64,
        /// Revision currently stored
        found: u64,
    },

    /// Record failed boundary validation
    #[error("invalid record: {0}")]
    Invalid(String),

    /// Underlying storage failed
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Failures surfaced by lifecycle operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    /// Required text missing or a request that can never be valid
    #[error("validation failed: {0}")]
    Validation(String),

    /// Issue id does not exist
    #[error("issue not found: {0}")]
    NotFound(String),

    /// Transition not allowed from the current state
    #[error("issue {id} is {status}: {reason}")]
    InvalidState {
        /// Issue id
        id: String,
        /// Status at the time of the attempt
        status: IssueStatus,
        /// What was refused
        reason: String,
    },

    /// Caller lacks the identity the transition requires
    #[error("{caller} is not allowed to {action}")]
    Unauthorized {
        /// Caller identity
        caller: String,
        /// Refused action
        action: String,
    },

    /// Primary store update failed; nothing was applied
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl IssueError {
    /// Shorthand for [`IssueError::InvalidState`]
    #[must_use]
    pub fn invalid_state(id: &str, status: IssueStatus, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            id: id.to_string(),
            status,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`IssueError::Unauthorized`]
    #[must_use]
    pub fn unauthorized(caller: &str, action: impl Into<String>) -> Self {
        Self::Unauthorized {
            caller: caller.to_string(),
            action: action.into(),
        }
    }
}

/// The state change was applied but its audit record was lost
///
/// Logged and reported, never returned as an operation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timeline append for {issue_id} ({kind}) failed: {source}")]
pub struct TimelineWriteFailure {
    /// Issue whose event was lost
    pub issue_id: String,
    /// Event kind that was not recorded
    pub kind: EventKind,
    /// Store failure
    #[source]
    pub source: StoreError,
}
