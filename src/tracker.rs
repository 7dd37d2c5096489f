//! Issue tracker
//!
//! Wires the pure lifecycle services to the store and clock ports. Every
//! mutation is read, transition, conditional update: a revision conflict
//! re-reads the record and re-applies the transition, so concurrent callers
//! never lose each other's changes. The timeline append happens after the
//! update succeeds; losing it is logged and reported but never undoes the
//! state change.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::error::{IssueError, StoreError, TimelineWriteFailure};
use crate::core::models::{
    Actor, Caller, EventKind, Issue, IssueStatus, NewIssue, TimelineEvent, is_reserved_user_id,
};
use crate::core::ports::{Clock, IssueStore, TimelineStore};
use crate::core::services::lifecycle::{self, LifecyclePolicy, Outcome, VerifyMode};
use crate::core::services::queue::{self, IssueStats, QueueFilter, ReporterIssues};
use crate::core::services::{add_affected, derive_priority, sla_hours_for, timeline};

/// Default number of re-reads after a revision conflict
pub const DEFAULT_MAX_UPDATE_RETRIES: u32 = 5;

/// Result of a tracker operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    /// The issue as stored after the operation
    pub issue: Issue,
    /// False when the operation was an idempotent repeat
    pub changed: bool,
    /// Set when the state change landed but its timeline event did not
    pub timeline_failure: Option<TimelineWriteFailure>,
}

impl Mutation {
    const fn unchanged(issue: Issue) -> Self {
        Self {
            issue,
            changed: false,
            timeline_failure: None,
        }
    }
}

/// Lifecycle operations over injected stores and clock
pub struct IssueTracker {
    issues: Arc<dyn IssueStore>,
    timeline: Arc<dyn TimelineStore>,
    clock: Arc<dyn Clock>,
    policy: LifecyclePolicy,
    max_retries: u32,
}

impl fmt::Debug for IssueTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueTracker")
            .field("policy", &self.policy)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl IssueTracker {
    /// Create a tracker with the default policy
    #[must_use]
    pub fn new(
        issues: Arc<dyn IssueStore>,
        timeline: Arc<dyn TimelineStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            issues,
            timeline,
            clock,
            policy: LifecyclePolicy::default(),
            max_retries: DEFAULT_MAX_UPDATE_RETRIES,
        }
    }

    /// Replace the lifecycle policy
    #[must_use]
    pub const fn with_policy(mut self, policy: LifecyclePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the conflict retry limit
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// The lifecycle policy in effect
    #[must_use]
    pub const fn policy(&self) -> LifecyclePolicy {
        self.policy
    }

    /// Current instant according to the injected clock
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// File a new issue on behalf of `caller`
    ///
    /// Priority and SLA are derived from the category and description and
    /// fixed from here on. The reporter is the first affected user.
    pub fn create_issue(&self, new: NewIssue, caller: &Caller) -> Result<Mutation, IssueError> {
        let reporter = caller.id.trim();
        if reporter.is_empty() {
            return Err(IssueError::Validation("reporter is required".to_string()));
        }
        unreserved(caller)?;
        let new = NewIssue {
            title: required(&new.title, "title")?,
            description: required(&new.description, "description")?,
            category: required(&new.category, "category")?,
            location: new.location.trim().to_string(),
            ..new
        };

        let priority = derive_priority(&new.category, &new.description);
        let draft = Issue::new(new, reporter, priority, sla_hours_for(priority), self.clock.now());
        let issue = self.issues.create(draft)?;
        log::debug!("Reported {} ({}, SLA {}h)", issue.id, issue.priority, issue.sla_hours);

        let event = TimelineEvent::new(
            issue.id.clone(),
            EventKind::Reported,
            "Issue reported",
            Actor::User(issue.reporter_id.clone()),
            issue.created_at,
        );
        let timeline_failure = self.record(&event);
        Ok(Mutation {
            issue,
            changed: true,
            timeline_failure,
        })
    }

    /// Fetch an issue
    pub fn get_issue(&self, id: &str) -> Result<Issue, IssueError> {
        self.issues.get(id).map_err(not_found)
    }

    /// Move an issue between `Pending` and `InProgress` (administrators only)
    pub fn set_status(
        &self,
        id: &str,
        status: IssueStatus,
        caller: &Caller,
    ) -> Result<Mutation, IssueError> {
        unreserved(caller)?;
        self.mutate(id, |issue, now| lifecycle::set_status(issue, status, caller, now))
    }

    /// Resolve an issue and open its verification window (administrators only)
    pub fn resolve(
        &self,
        id: &str,
        note: &str,
        image_ref: Option<&str>,
        caller: &Caller,
    ) -> Result<Mutation, IssueError> {
        unreserved(caller)?;
        let policy = self.policy;
        self.mutate(id, |issue, now| {
            lifecycle::resolve(issue, note, image_ref, caller, now, policy)
        })
    }

    /// Reporter confirms the resolution
    pub fn verify(&self, id: &str, caller: &Caller) -> Result<Mutation, IssueError> {
        self.mutate(id, |issue, now| lifecycle::verify(issue, VerifyMode::Reporter(caller), now))
    }

    /// Verify on behalf of the system once the window has elapsed
    pub fn auto_verify(&self, id: &str) -> Result<Mutation, IssueError> {
        self.mutate(id, |issue, now| lifecycle::verify(issue, VerifyMode::Expired, now))
    }

    /// Reporter disputes the resolution
    pub fn reopen(
        &self,
        id: &str,
        category: &str,
        text: &str,
        caller: &Caller,
    ) -> Result<Mutation, IssueError> {
        self.mutate(id, |issue, now| lifecycle::reopen(issue, category, text, caller, now))
    }

    /// Record `caller` as affected ("me too")
    pub fn add_affected(&self, id: &str, caller: &Caller) -> Result<Mutation, IssueError> {
        self.mutate(id, |issue, now| add_affected(issue, &caller.id, now))
    }

    /// Audit trail of an issue, oldest first
    pub fn get_timeline(&self, id: &str) -> Result<Vec<TimelineEvent>, IssueError> {
        let issue = self.get_issue(id)?;
        let events = self.timeline.for_issue(id)?;
        Ok(timeline::assemble(&issue, events))
    }

    /// Every issue, in store order
    pub fn list_issues(&self) -> Result<Vec<Issue>, IssueError> {
        Ok(self.issues.scan_all()?)
    }

    /// Issues currently in `status`
    pub fn issues_with_status(&self, status: IssueStatus) -> Result<Vec<Issue>, IssueError> {
        Ok(self.issues.list_by_status(status)?)
    }

    /// Public, unresolved issues matching `filter`
    pub fn feed(&self, filter: &QueueFilter) -> Result<Vec<Issue>, IssueError> {
        Ok(queue::public_feed(self.list_issues()?, filter))
    }

    /// The caller's own issues, private ones included
    pub fn reported_by(&self, caller: &Caller) -> Result<ReporterIssues, IssueError> {
        Ok(queue::reported_by(self.list_issues()?, caller.id.trim()))
    }

    /// Unresolved issues for administrators
    pub fn admin_queue(&self, filter: &QueueFilter) -> Result<Vec<Issue>, IssueError> {
        Ok(queue::admin_queue(self.list_issues()?, filter))
    }

    /// Resolved issues, latest first
    pub fn resolved(&self) -> Result<Vec<Issue>, IssueError> {
        Ok(queue::resolved_list(self.list_issues()?))
    }

    /// Counts by status
    pub fn stats(&self) -> Result<IssueStats, IssueError> {
        Ok(queue::stats(&self.list_issues()?))
    }

    fn mutate<F>(&self, id: &str, mut transition: F) -> Result<Mutation, IssueError>
    where
        F: FnMut(&Issue, DateTime<Utc>) -> Result<Outcome, IssueError>,
    {
        let mut retries = 0;
        loop {
            let current = self.get_issue(id)?;
            let (next, event) = match transition(&current, self.clock.now())? {
                Outcome::Unchanged => return Ok(Mutation::unchanged(current)),
                Outcome::Changed { issue, event } => (*issue, event),
            };

            match self.issues.update(&next) {
                Ok(stored) => {
                    log::debug!("{} {}: {}", stored.id, event.kind, event.message);
                    let timeline_failure = self.record(&event);
                    return Ok(Mutation {
                        issue: stored,
                        changed: true,
                        timeline_failure,
                    });
                },
                Err(StoreError::Conflict { .. }) if retries < self.max_retries => {
                    retries += 1;
                    log::debug!("Revision conflict on {id}, retry {retries}/{}", self.max_retries);
                },
                Err(err) => return Err(not_found(err)),
            }
        }
    }

    fn record(&self, event: &TimelineEvent) -> Option<TimelineWriteFailure> {
        let source = self.timeline.append(event).err()?;
        let failure = TimelineWriteFailure {
            issue_id: event.issue_id.clone(),
            kind: event.kind,
            source,
        };
        log::warn!("{failure}");
        Some(failure)
    }
}

fn unreserved(caller: &Caller) -> Result<(), IssueError> {
    if is_reserved_user_id(&caller.id) {
        return Err(IssueError::Validation(format!("user id {} is reserved", caller.id.trim())));
    }
    Ok(())
}

fn required(value: &str, field: &str) -> Result<String, IssueError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(IssueError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

fn not_found(err: StoreError) -> IssueError {
    match err {
        StoreError::NotFound(id) => IssueError::NotFound(id),
        other => IssueError::Persistence(other),
    }
}
