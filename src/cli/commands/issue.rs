//! Single-issue commands - status changes, resolution, verification, reopen, me-too

use campusfix::Mutation;
use campusfix::core::models::IssueStatus;
use campusfix::output::{IssueDetail, IssueResult, IssueView, TimelineResult};

use super::Context;

fn render(ctx: &Context, action: &str, mutation: Mutation) {
    IssueResult {
        action: action.to_string(),
        changed: mutation.changed,
        timeline_warning: mutation.timeline_failure.map(|f| f.to_string()),
        issue: IssueView::new(mutation.issue, ctx.tracker.now()),
    }
    .render(ctx.mode);
}

/// Move an issue between pending and in-progress
pub fn set_status(ctx: &Context, id: &str, status: IssueStatus) -> anyhow::Result<()> {
    let mutation = ctx.tracker.set_status(id, status, &ctx.caller()?)?;
    render(ctx, &format!("Status set to {status}"), mutation);
    Ok(())
}

/// Resolve an issue
pub fn resolve(ctx: &Context, id: &str, note: &str, image: Option<&str>) -> anyhow::Result<()> {
    let mutation = ctx.tracker.resolve(id, note, image, &ctx.caller()?)?;
    render(ctx, "Resolved", mutation);
    Ok(())
}

/// Confirm a resolution
pub fn verify(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let mutation = ctx.tracker.verify(id, &ctx.caller()?)?;
    render(ctx, "Verified", mutation);
    Ok(())
}

/// Dispute a resolution
pub fn reopen(ctx: &Context, id: &str, category: &str, reason: &str) -> anyhow::Result<()> {
    let mutation = ctx.tracker.reopen(id, category, reason, &ctx.caller()?)?;
    render(ctx, "Reopened", mutation);
    Ok(())
}

/// Join the affected users
pub fn me_too(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let mutation = ctx.tracker.add_affected(id, &ctx.caller()?)?;
    render(ctx, "Marked as affected", mutation);
    Ok(())
}

/// Show one issue
pub fn show(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let issue = ctx.tracker.get_issue(id)?;
    IssueDetail(IssueView::new(issue, ctx.tracker.now())).render(ctx.mode);
    Ok(())
}

/// Show an issue's timeline
pub fn timeline(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let events = ctx.tracker.get_timeline(id)?;
    TimelineResult {
        issue_id: id.to_string(),
        events,
    }
    .render(ctx.mode);
    Ok(())
}
