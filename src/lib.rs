//! campusfix - Lifecycle engine for campus facility issues
//!
//! This library tracks facility issues from report to verified resolution:
//! keyword-derived priority and SLA deadlines, crowd-sourced escalation,
//! a time-bounded verification window with automatic expiry, and an
//! append-only audit timeline.
//!
//! - [`core`] - Domain models, port traits and pure lifecycle services
//! - [`adapters`] - In-memory and JSON file stores, clocks
//! - [`tracker`] - Lifecycle operations over the stores
//! - [`scheduler`] - Periodic auto-verification

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod config;
pub mod core;
pub mod output;
pub mod paths;
pub mod scheduler;
pub mod tracker;

pub use config::Config;
pub use crate::core::error::{IssueError, StoreError, TimelineWriteFailure};
pub use crate::core::models::{Caller, Issue, IssueStatus, NewIssue, Priority, TimelineEvent};
pub use scheduler::{SweepReport, VerificationScheduler};
pub use tracker::{IssueTracker, Mutation};
