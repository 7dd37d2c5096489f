//! Core domain logic for campusfix
//!
//! This module contains pure business logic with no I/O dependencies.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Issue, Priority, TimelineEvent, Caller)
//! - `services/` - Transition rules, priority engine, listings
//! - `ports/` - Trait definitions for stores and the clock
//! - `error` - Domain and store error types

pub mod error;
pub mod models;
pub mod ports;
pub mod services;

pub use error::{IssueError, StoreError, TimelineWriteFailure};
