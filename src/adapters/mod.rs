//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `memory` - In-process issue and timeline storage
//! - `json_file` - JSON files in a data directory
//! - `clock` - System clock and a manually driven clock

pub mod clock;
pub mod json_file;
pub mod memory;

pub use clock::{ManualClock, SystemClock};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::core::error::StoreError;
use crate::core::models::Issue;

/// Prefix of store-assigned issue ids
pub const ISSUE_ID_PREFIX: &str = "ISS";

/// Next `ISS-<n>` id after the highest existing one
fn next_issue_id<'a>(existing: impl Iterator<Item = &'a str>) -> String {
    let max_num = existing
        .filter_map(|id| {
            id.strip_prefix(ISSUE_ID_PREFIX)
                .and_then(|s| s.strip_prefix('-'))
                .and_then(|n| n.parse::<u64>().ok())
        })
        .max()
        .unwrap_or(0);

    format!("{ISSUE_ID_PREFIX}-{}", max_num + 1)
}

/// Boundary checks for a conditional update of `stored` with `incoming`
///
/// Returns the record to persist, with its revision bumped.
fn guard_update(stored: &Issue, incoming: &Issue) -> Result<Issue, StoreError> {
    if stored.revision != incoming.revision {
        return Err(StoreError::Conflict {
            id: incoming.id.clone(),
            expected: incoming.revision,
            found: stored.revision,
        });
    }
    incoming.validate().map_err(StoreError::Invalid)?;
    if stored.created_at != incoming.created_at
        || stored.sla_hours != incoming.sla_hours
        || stored.reporter_id != incoming.reporter_id
    {
        return Err(StoreError::Invalid(format!(
            "{}: creation fields are immutable",
            incoming.id
        )));
    }

    let mut next = incoming.clone();
    next.revision = stored.revision + 1;
    Ok(next)
}
