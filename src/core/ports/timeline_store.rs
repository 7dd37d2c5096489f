//! Timeline store port
//!
//! Append-only persistence for audit events.

use super::super::error::StoreError;
use super::super::models::TimelineEvent;

/// Persistence for timeline events
#[cfg_attr(test, mockall::automock)]
pub trait TimelineStore: Send + Sync {
    /// Append one event
    fn append(&self, event: &TimelineEvent) -> Result<(), StoreError>;

    /// Events for an issue, ascending by timestamp, ties in insertion order
    fn for_issue(&self, issue_id: &str) -> Result<Vec<TimelineEvent>, StoreError>;
}
