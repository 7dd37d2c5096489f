//! Domain models for campusfix
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Issue`] - A reported facility problem and its lifecycle state
//! - [`Priority`] - Ordered urgency scale
//! - [`TimelineEvent`] - One immutable audit record
//! - [`Caller`] - The identity an operation runs on behalf of

mod caller;
mod issue;
mod priority;
mod timeline;

pub use caller::{Caller, Role};
pub use issue::{
    Issue, IssueState, IssueStatus, NewIssue, ReopenReason, Resolution, Visibility,
};
pub use priority::Priority;
pub use timeline::{Actor, EventKind, SYSTEM_ACTOR, TimelineEvent, is_reserved_user_id};
