//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::core::models::{Issue, IssueStatus, Priority, TimelineEvent};
use crate::core::services::verification::hours_left;
use crate::core::services::{IssueStats, ReporterIssues, SlaStatus, sla_status};
use crate::scheduler::SweepReport;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// An issue together with the figures derived from it at render time
#[derive(Debug, Clone, Serialize)]
pub struct IssueView {
    /// Stored record
    #[serde(flatten)]
    pub issue: Issue,
    /// Reporter-facing id
    pub display_id: String,
    /// Number of affected users
    pub affected_count: usize,
    /// Standing against the SLA deadline
    pub sla: SlaStatus,
    /// Hours the reporter has left to verify, when awaiting verification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_hours_left: Option<i64>,
}

impl IssueView {
    /// Derive the view of `issue` at `now`
    #[must_use]
    pub fn new(issue: Issue, now: DateTime<Utc>) -> Self {
        Self {
            display_id: issue.display_id(),
            affected_count: issue.affected_count(),
            sla: sla_status(&issue, now),
            verification_hours_left: hours_left(&issue, now),
            issue,
        }
    }

    fn render_line(&self) {
        println!(
            "  {:<10} {:<9} {:<12} {}",
            self.issue.id,
            priority_label(self.issue.priority),
            status_label(self.issue.status()),
            self.issue.title
        );
    }

    fn render_detail(&self) {
        let issue = &self.issue;
        println!("{} {}", self.display_id.bold(), issue.title);
        println!("  ID:        {}", issue.id);
        println!(
            "  Status:    {} / {}",
            status_label(issue.status()),
            priority_label(issue.priority)
        );
        println!("  Category:  {}", issue.category);
        if !issue.location.is_empty() {
            println!("  Location:  {}", issue.location);
        }
        println!("  Reporter:  {} ({} affected)", issue.reporter_id, self.affected_count);
        println!(
            "  SLA:       {}h, due {} ({})",
            issue.sla_hours,
            issue.sla_deadline.format("%Y-%m-%d %H:%M UTC"),
            sla_label(self.sla)
        );
        println!("  {}", issue.description.dimmed());

        if let Some(resolution) = issue.resolution() {
            println!(
                "  Resolved:  {} by {}",
                resolution.resolved_at.format("%Y-%m-%d %H:%M UTC"),
                resolution.resolved_by
            );
            println!("  Note:      {}", resolution.note);
            if resolution.verified {
                println!("  {}", "Verified".green());
            } else if let Some(hours) = self.verification_hours_left {
                println!("  Awaiting verification ({hours}h left)");
            }
        }
        if let Some(reason) = &issue.reopen_reason {
            println!(
                "  Reopened:  {} - {} (by {})",
                reason.category, reason.text, reason.reopened_by
            );
        }
    }
}

fn priority_label(priority: Priority) -> ColoredString {
    let text = priority.to_string();
    match priority {
        Priority::Critical => text.red().bold(),
        Priority::High => text.red(),
        Priority::Medium => text.yellow(),
        Priority::Low => text.green(),
    }
}

fn status_label(status: IssueStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        IssueStatus::Pending => text.yellow(),
        IssueStatus::InProgress => text.cyan(),
        IssueStatus::Resolved => text.green(),
    }
}

fn sla_label(sla: SlaStatus) -> ColoredString {
    let text = sla.to_string();
    match sla {
        SlaStatus::Missed => text.red().bold(),
        SlaStatus::Urgent => text.red(),
        SlaStatus::Warning => text.yellow(),
        SlaStatus::OnTrack | SlaStatus::Closed => text.normal(),
    }
}

/// Result of a single issue operation
#[derive(Debug, Serialize)]
pub struct IssueResult {
    /// What was done (e.g. "Resolved")
    pub action: String,
    /// False for idempotent repeats
    pub changed: bool,
    /// The issue afterwards
    pub issue: IssueView,
    /// Set when the audit record could not be written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_warning: Option<String>,
}

impl IssueResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        if self.changed {
            println!("{} {}: {}", "✓".green().bold(), self.action, self.issue.issue.id);
        } else {
            println!("{} {}: nothing to do", "·".dimmed(), self.issue.issue.id);
        }
        if let Some(warning) = &self.timeline_warning {
            eprintln!("{} {warning}", "warning:".yellow().bold());
        }
        self.issue.render_detail();
    }
}

/// A titled list of issues
#[derive(Debug, Serialize)]
pub struct IssueList {
    /// Heading for human output
    #[serde(skip)]
    pub title: String,
    /// Issues in display order
    pub issues: Vec<IssueView>,
}

impl IssueList {
    /// Build a list of views at `now`
    #[must_use]
    pub fn new(title: impl Into<String>, issues: Vec<Issue>, now: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            issues: issues.into_iter().map(|i| IssueView::new(i, now)).collect(),
        }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                if self.issues.is_empty() {
                    println!("No issues.");
                    return;
                }
                println!("{} ({}):\n", self.title, self.issues.len());
                for view in &self.issues {
                    view.render_line();
                }
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// A reporter's own issues
#[derive(Debug, Serialize)]
pub struct ReporterResult {
    /// Not yet resolved, newest first
    pub active: IssueList,
    /// Resolved, latest first
    pub resolved: IssueList,
}

impl ReporterResult {
    /// Build both sections at `now`
    #[must_use]
    pub fn new(issues: ReporterIssues, now: DateTime<Utc>) -> Self {
        Self {
            active: IssueList::new("Active", issues.active, now),
            resolved: IssueList::new("Resolved", issues.resolved, now),
        }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                self.active.render(mode);
                println!();
                self.resolved.render(mode);
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// Detail view of one issue
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct IssueDetail(pub IssueView);

impl IssueDetail {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.0.render_detail(),
            OutputMode::Json => print_json(self),
        }
    }
}

/// Audit trail of one issue
#[derive(Debug, Serialize)]
pub struct TimelineResult {
    /// Issue id
    pub issue_id: String,
    /// Events, oldest first
    pub events: Vec<TimelineEvent>,
}

impl TimelineResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                println!("Timeline for {}:\n", self.issue_id);
                for event in &self.events {
                    println!(
                        "  {}  {:<14} {}  ({})",
                        event.timestamp.format("%Y-%m-%d %H:%M"),
                        event.kind.to_string().bold(),
                        event.message,
                        event.actor
                    );
                }
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct StatsResult(pub IssueStats);

impl StatsResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                let s = &self.0;
                println!("Pending:     {}", s.pending);
                println!("In Progress: {}", s.in_progress);
                println!("Resolved:    {} ({} verified)", s.resolved, s.verified);
                println!("Total:       {}", s.total);
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// Outcome of a manual verification sweep
#[derive(Debug, Serialize)]
pub struct SweepResult {
    /// Resolved issues examined
    pub scanned: usize,
    /// Issues whose window had elapsed
    pub due: usize,
    /// Issues verified by this sweep
    pub verified: Vec<String>,
    /// Due issues no longer eligible
    pub skipped: usize,
    /// `(id, error)` for each failed verification
    pub failed: Vec<(String, String)>,
    /// Lost timeline events
    pub timeline_failures: Vec<String>,
}

impl From<SweepReport> for SweepResult {
    fn from(report: SweepReport) -> Self {
        Self {
            scanned: report.scanned,
            due: report.due,
            verified: report.verified,
            skipped: report.skipped,
            failed: report.failed.into_iter().map(|(id, e)| (id, e.to_string())).collect(),
            timeline_failures: report.timeline_failures.iter().map(ToString::to_string).collect(),
        }
    }
}

impl SweepResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                println!(
                    "Scanned {} resolved issue(s), {} past their verification window.",
                    self.scanned, self.due
                );
                for id in &self.verified {
                    println!("  {} auto-verified {id}", "✓".green());
                }
                for (id, err) in &self.failed {
                    println!("  {} {id}: {err}", "✗".red());
                }
                for warning in &self.timeline_failures {
                    eprintln!("{} {warning}", "warning:".yellow().bold());
                }
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => print_json(self),
        }
    }
}
