//! Business logic services
//!
//! Pure logic that operates on domain models. These services have no I/O
//! dependencies - they operate on data passed in and return results.
//!
//! - [`priority`] - Keyword priority, SLA hours, crowd escalation
//! - [`lifecycle`] - Status transitions, resolution, verification, reopen
//! - [`affected`] - "Me too" endorsements
//! - [`verification`] - Selecting issues whose window has elapsed
//! - [`timeline`] - Ordering and gap-filling of audit events
//! - [`sla`] - SLA deadline status
//! - [`queue`] - Feed, admin queue, reporter and dashboard listings

pub mod affected;
pub mod lifecycle;
pub mod priority;
pub mod queue;
pub mod sla;
pub mod timeline;
pub mod verification;

pub use affected::add_affected;
pub use lifecycle::{LifecyclePolicy, Outcome, VerifyMode};
pub use priority::{crowd_priority, derive_priority, sla_hours_for};
pub use queue::{IssueStats, QueueFilter, ReporterIssues};
pub use sla::{SlaStatus, sla_status};
