//! Store failures: lost timeline writes and per-issue sweep failures

use std::sync::Arc;

use campusfix::adapters::{ManualClock, MemoryStore};
use campusfix::core::models::{Actor, EventKind, IssueStatus};
use campusfix::{IssueError, IssueTracker, StoreError, VerificationScheduler};
use chrono::TimeDelta;

use crate::common::fixtures::{NewIssueBuilder, admin, reporter, t0};
use crate::common::mocks::{BrokenIssue, FailingTimeline};

#[test]
fn test_lost_timeline_write_is_reported_not_fatal() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = IssueTracker::new(store, Arc::new(FailingTimeline), clock);

    let created = tracker.create_issue(NewIssueBuilder::new().build(), &reporter()).unwrap();
    let failure = created.timeline_failure.unwrap();
    assert_eq!(failure.kind, EventKind::Reported);
    assert_eq!(failure.issue_id, created.issue.id);
    assert!(matches!(failure.source, StoreError::Backend(_)));

    let resolved = tracker.resolve(&created.issue.id, "Fixed", None, &admin()).unwrap();
    assert_eq!(resolved.issue.status(), IssueStatus::Resolved);
    assert!(resolved.timeline_failure.is_some());
    assert_eq!(tracker.get_issue(&created.issue.id).unwrap().status(), IssueStatus::Resolved);
}

#[test]
fn test_empty_timeline_still_shows_the_report() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = IssueTracker::new(store, Arc::new(FailingTimeline), clock);
    let issue = tracker.create_issue(NewIssueBuilder::new().build(), &reporter()).unwrap().issue;

    let timeline = tracker.get_timeline(&issue.id).unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].kind, EventKind::Reported);
    assert_eq!(timeline[0].timestamp, issue.created_at);
    assert_eq!(timeline[0].actor, Actor::User(issue.reporter_id));
}

#[test]
fn test_sweep_continues_past_a_failing_issue() {
    let store = Arc::new(BrokenIssue::new());
    let timeline = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = Arc::new(IssueTracker::new(store.clone(), timeline, clock.clone()));

    let mut ids = Vec::new();
    for _ in 0..3 {
        let new = NewIssueBuilder::new().build();
        let id = tracker.create_issue(new, &reporter()).unwrap().issue.id;
        tracker.resolve(&id, "Fixed", None, &admin()).unwrap();
        ids.push(id);
    }
    store.break_issue(&ids[1]);
    clock.advance(TimeDelta::hours(49));

    let report = VerificationScheduler::new(tracker.clone()).sweep().unwrap();
    assert_eq!(report.due, 3);
    assert_eq!(report.verified.len(), 2);
    assert!(!report.verified.contains(&ids[1]));
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, ids[1]);
    assert!(matches!(report.failed[0].1, IssueError::Persistence(StoreError::Backend(_))));

    assert!(tracker.get_issue(&ids[0]).unwrap().is_verified());
    assert!(!tracker.get_issue(&ids[1]).unwrap().is_verified());
    assert!(tracker.get_issue(&ids[2]).unwrap().is_verified());
}

#[test]
fn test_sweep_reports_lost_verification_events() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = Arc::new(IssueTracker::new(store, Arc::new(FailingTimeline), clock.clone()));
    let id = tracker.create_issue(NewIssueBuilder::new().build(), &reporter()).unwrap().issue.id;
    tracker.resolve(&id, "Fixed", None, &admin()).unwrap();
    clock.advance(TimeDelta::hours(49));

    let report = VerificationScheduler::new(tracker).sweep().unwrap();
    assert_eq!(report.verified, vec![id.clone()]);
    assert_eq!(report.timeline_failures.len(), 1);
    assert_eq!(report.timeline_failures[0].kind, EventKind::Verified);
}

#[test]
fn test_early_auto_verify_is_refused() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let tracker = IssueTracker::new(store.clone(), store, clock.clone());
    let id = tracker.create_issue(NewIssueBuilder::new().build(), &reporter()).unwrap().issue.id;
    tracker.resolve(&id, "Fixed", None, &admin()).unwrap();

    clock.advance(TimeDelta::hours(48));
    assert!(matches!(tracker.auto_verify(&id), Err(IssueError::InvalidState { .. })));
    clock.advance(TimeDelta::seconds(1));
    assert!(tracker.auto_verify(&id).unwrap().changed);
}
