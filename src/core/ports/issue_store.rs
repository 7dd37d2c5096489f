//! Issue store port
//!
//! Durable home of issue records. The store is the authority for the
//! current value of an issue; callers hold fetched copies.

use super::super::error::StoreError;
use super::super::models::{Issue, IssueStatus};

/// Persistence for issues
///
/// `update` is a compare-and-swap on [`Issue::revision`]: it succeeds only
/// if the stored revision equals the one on the record being written, and
/// the returned record carries the bumped revision. Implementations must
/// reject records that fail [`Issue::validate`] with [`StoreError::Invalid`].
#[cfg_attr(test, mockall::automock)]
pub trait IssueStore: Send + Sync {
    /// Persist a new issue, assigning its id
    ///
    /// Returns the stored record (id set, revision 0).
    fn create(&self, issue: Issue) -> Result<Issue, StoreError>;

    /// Fetch an issue by id
    fn get(&self, id: &str) -> Result<Issue, StoreError>;

    /// Conditionally replace an issue
    fn update(&self, issue: &Issue) -> Result<Issue, StoreError>;

    /// All issues, in no particular order
    fn scan_all(&self) -> Result<Vec<Issue>, StoreError>;

    /// Issues currently in `status`
    fn list_by_status(&self, status: IssueStatus) -> Result<Vec<Issue>, StoreError> {
        Ok(self.scan_all()?.into_iter().filter(|i| i.status() == status).collect())
    }
}
