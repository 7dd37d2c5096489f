//! Priority engine
//!
//! Derives the initial priority and SLA of an issue from its text, and the
//! crowd-driven priority from its affected count. Pure functions only.

use crate::core::models::Priority;

/// Keyword rules, evaluated in order; first match wins
const KEYWORD_RULES: &[(&[&str], Priority)] = &[
    (
        &["safety", "hazard", "fire", "shock", "danger", "emergency"],
        Priority::Critical,
    ),
    (&["water", "plumbing", "leak"], Priority::High),
    (&["electric", "power", "light"], Priority::High),
    (&["clean", "infrastructure", "wifi"], Priority::Medium),
];

/// Affected-count thresholds, evaluated top-down
const CROWD_THRESHOLDS: [(usize, Priority); 3] = [
    (50, Priority::Critical),
    (20, Priority::High),
    (10, Priority::Medium),
];

/// Derive the initial priority from category and description
///
/// Case-insensitive substring scan over `"{category} {description}"`.
/// Anything unmatched is `Medium`.
#[must_use]
pub fn derive_priority(category: &str, description: &str) -> Priority {
    let text = format!("{category} {description}").to_lowercase();

    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map_or(Priority::Medium, |(_, priority)| *priority)
}

/// SLA duration in hours for a priority
#[must_use]
pub const fn sla_hours_for(priority: Priority) -> u32 {
    match priority {
        Priority::Critical => 2,
        Priority::High => 6,
        Priority::Medium => 24,
        Priority::Low => 48,
    }
}

/// Priority after the affected count reaches `count`
///
/// Escalation is one-directional: the first threshold reached sets a floor,
/// and a priority already above that floor is kept. Below the lowest
/// threshold the current priority is returned unchanged.
#[must_use]
pub fn crowd_priority(count: usize, current: Priority) -> Priority {
    CROWD_THRESHOLDS
        .iter()
        .find(|(threshold, _)| count >= *threshold)
        .map_or(current, |(_, floor)| current.max(*floor))
}
