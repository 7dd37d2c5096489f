//! Issue listings for the feed, the admin queue and the dashboard counters

use std::cmp::Reverse;

use serde::Serialize;

use crate::core::models::{Issue, IssueStatus, Priority, Visibility};

/// Filters for the feed and the admin queue; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueFilter {
    /// Only this status
    pub status: Option<IssueStatus>,
    /// Only this category (case-insensitive)
    pub category: Option<String>,
    /// Only this priority
    pub priority: Option<Priority>,
}

impl QueueFilter {
    fn matches(&self, issue: &Issue) -> bool {
        self.status.is_none_or(|s| issue.status() == s)
            && self
                .category
                .as_deref()
                .is_none_or(|c| issue.category.eq_ignore_ascii_case(c))
            && self.priority.is_none_or(|p| issue.priority == p)
    }
}

/// Public, unresolved issues: newest first, then priority, then crowd size
#[must_use]
pub fn public_feed(mut issues: Vec<Issue>, filter: &QueueFilter) -> Vec<Issue> {
    issues.retain(|i| {
        i.visibility == Visibility::Public
            && i.status() != IssueStatus::Resolved
            && filter.matches(i)
    });
    issues.sort_by_key(|i| {
        (Reverse(i.created_at), Reverse(i.priority), Reverse(i.affected_count()))
    });
    issues
}

/// Unresolved issues for administrators: most urgent priority, then earliest SLA deadline
#[must_use]
pub fn admin_queue(mut issues: Vec<Issue>, filter: &QueueFilter) -> Vec<Issue> {
    issues.retain(|i| i.status() != IssueStatus::Resolved && filter.matches(i));
    issues.sort_by_key(|i| (Reverse(i.priority), i.sla_deadline));
    issues
}

/// Resolved issues, most recently resolved first
#[must_use]
pub fn resolved_list(mut issues: Vec<Issue>) -> Vec<Issue> {
    issues.retain(|i| i.status() == IssueStatus::Resolved);
    issues.sort_by_key(|i| Reverse(i.resolved_at()));
    issues
}

/// One reporter's own issues, split the way the reporter page shows them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReporterIssues {
    /// Not yet resolved, newest first
    pub active: Vec<Issue>,
    /// Resolved, most recently resolved first
    pub resolved: Vec<Issue>,
}

/// Issues filed by `reporter_id`, private ones included
#[must_use]
pub fn reported_by(issues: Vec<Issue>, reporter_id: &str) -> ReporterIssues {
    let (resolved, mut active): (Vec<_>, Vec<_>) = issues
        .into_iter()
        .filter(|i| i.is_reporter(reporter_id))
        .partition(|i| i.status() == IssueStatus::Resolved);
    active.sort_by_key(|i| Reverse(i.created_at));
    ReporterIssues {
        active,
        resolved: resolved_list(resolved),
    }
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueStats {
    /// Issues awaiting work
    pub pending: usize,
    /// Issues being worked on
    pub in_progress: usize,
    /// Issues resolved (verified or not)
    pub resolved: usize,
    /// Resolved issues that have been verified
    pub verified: usize,
    /// All issues
    pub total: usize,
}

/// Count issues by status
#[must_use]
pub fn stats(issues: &[Issue]) -> IssueStats {
    issues.iter().fold(IssueStats::default(), |mut acc, issue| {
        acc.total += 1;
        match issue.status() {
            IssueStatus::Pending => acc.pending += 1,
            IssueStatus::InProgress => acc.in_progress += 1,
            IssueStatus::Resolved => {
                acc.resolved += 1;
                if issue.is_verified() {
                    acc.verified += 1;
                }
            },
        }
        acc
    })
}
