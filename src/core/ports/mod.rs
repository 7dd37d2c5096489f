//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the lifecycle engine and
//! the outside world (storage backends and time).
//!
//! Implementations live in the `adapters` module.
//!
//! ## Design Principle
//!
//! The core domain logic depends only on these traits, never on concrete
//! implementations. This enables:
//!
//! - **Testability**: In-memory stores, mocks and a manual clock in tests
//! - **Flexibility**: Swap the JSON file store for another backend
//! - **Clarity**: Clear boundaries between layers

mod clock;
mod issue_store;
mod timeline_store;

pub use clock::Clock;
pub use issue_store::IssueStore;
pub use timeline_store::TimelineStore;

#[cfg(test)]
pub use clock::MockClock;
#[cfg(test)]
pub use issue_store::MockIssueStore;
#[cfg(test)]
pub use timeline_store::MockTimelineStore;
