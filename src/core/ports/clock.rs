//! Clock port
//!
//! Every instant the engine records comes from an injected clock so that
//! tests can drive time explicitly.

use chrono::{DateTime, Utc};

/// Source of the current instant
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}
