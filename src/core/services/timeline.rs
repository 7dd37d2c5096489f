//! Timeline assembly
//!
//! Orders stored events and fills in the `reported` entry for issues whose
//! timeline is empty (records created before the timeline existed, or whose
//! first append was lost).

use crate::core::models::{Actor, EventKind, Issue, TimelineEvent};

/// Sort events ascending by timestamp, keeping insertion order for ties
pub fn order_events(events: &mut [TimelineEvent]) {
    events.sort_by_key(|e| e.timestamp);
}

/// The `reported` event implied by an issue's creation fields
#[must_use]
pub fn synthesized_reported(issue: &Issue) -> TimelineEvent {
    TimelineEvent::new(
        issue.id.clone(),
        EventKind::Reported,
        "Issue reported",
        Actor::User(issue.reporter_id.clone()),
        issue.created_at,
    )
}

/// The timeline to show for `issue`, given what the store returned
#[must_use]
pub fn assemble(issue: &Issue, mut events: Vec<TimelineEvent>) -> Vec<TimelineEvent> {
    if events.is_empty() {
        return vec![synthesized_reported(issue)];
    }
    order_events(&mut events);
    events
}
