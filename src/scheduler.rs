//! Verification window scheduler
//!
//! Periodically auto-verifies resolved issues whose reporter let the
//! verification window run out. A sweep is safe to repeat: verifying an
//! already verified issue changes nothing, and an issue that another caller
//! touched mid-sweep is simply re-read.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::error::{IssueError, TimelineWriteFailure};
use crate::core::models::IssueStatus;
use crate::core::services::verification::due_for_verification;
use crate::tracker::IssueTracker;

/// Default time between sweeps
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// What one sweep did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Resolved issues examined
    pub scanned: usize,
    /// Issues whose window had elapsed
    pub due: usize,
    /// Issues this sweep verified
    pub verified: Vec<String>,
    /// Due issues that were no longer eligible when re-read
    pub skipped: usize,
    /// Issues whose verification failed
    pub failed: Vec<(String, IssueError)>,
    /// Verifications that landed without their timeline event
    pub timeline_failures: Vec<TimelineWriteFailure>,
}

/// Drives [`IssueTracker::auto_verify`] on a fixed interval
#[derive(Debug, Clone)]
pub struct VerificationScheduler {
    tracker: Arc<IssueTracker>,
    interval: Duration,
}

impl VerificationScheduler {
    /// Scheduler ticking every [`DEFAULT_INTERVAL`]
    #[must_use]
    pub const fn new(tracker: Arc<IssueTracker>) -> Self {
        Self {
            tracker,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Replace the tick interval
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    /// The tick interval
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one sweep now
    ///
    /// Only a failure to scan the store is returned as an error. Failures
    /// on individual issues are collected in the report and the sweep moves
    /// on to the next issue.
    pub fn sweep(&self) -> Result<SweepReport, IssueError> {
        let issues = self.tracker.issues_with_status(IssueStatus::Resolved)?;
        let due = due_for_verification(&issues, self.tracker.now());
        let mut report = SweepReport {
            scanned: issues.len(),
            due: due.len(),
            ..SweepReport::default()
        };

        for id in due {
            match self.tracker.auto_verify(&id) {
                Ok(mutation) if mutation.changed => {
                    report.timeline_failures.extend(mutation.timeline_failure);
                    report.verified.push(id);
                },
                Ok(_) | Err(IssueError::InvalidState { .. }) => report.skipped += 1,
                Err(err) => {
                    log::warn!("Auto-verification of {id} failed: {err}");
                    report.failed.push((id, err));
                },
            }
        }

        if report.due > 0 {
            log::info!(
                "Verification sweep: {} scanned, {} verified, {} skipped, {} failed",
                report.scanned,
                report.verified.len(),
                report.skipped,
                report.failed.len()
            );
        } else {
            log::debug!("Verification sweep: {} scanned, nothing due", report.scanned);
        }
        Ok(report)
    }

    /// Tick until `shutdown` flips to `true` or its sender is dropped
    ///
    /// The first sweep runs immediately. Sweeps run on the blocking pool
    /// since the stores are synchronous.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        log::info!("Verification scheduler started (every {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick().await,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                },
            }
        }
        log::info!("Verification scheduler stopped");
    }

    /// Start [`run`](Self::run) on the current runtime
    #[must_use]
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(self.run(rx));
        SchedulerHandle { shutdown, task }
    }

    async fn tick(&self) {
        let this = self.clone();
        match tokio::task::spawn_blocking(move || this.sweep()).await {
            Ok(Ok(_)) => {},
            Ok(Err(err)) => log::warn!("Verification sweep aborted: {err}"),
            Err(err) => log::error!("Verification sweep task failed: {err}"),
        }
    }
}

/// Handle to a spawned scheduler
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop ticking and wait for the in-flight sweep to finish
    pub async fn shutdown(self) {
        // The receiver is gone only if the task already ended.
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            log::error!("Verification scheduler task failed: {err}");
        }
    }
}
