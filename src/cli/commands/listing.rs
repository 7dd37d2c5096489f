//! Listing commands - feed, own issues, admin queue, resolved list, stats

use campusfix::core::services::QueueFilter;
use campusfix::output::{IssueList, ReporterResult, StatsResult};

use super::Context;

/// Public unresolved issues
pub fn feed(ctx: &Context, filter: &QueueFilter) -> anyhow::Result<()> {
    let issues = ctx.tracker.feed(filter)?;
    IssueList::new("Community feed", issues, ctx.tracker.now()).render(ctx.mode);
    Ok(())
}

/// The acting user's reports
pub fn mine(ctx: &Context) -> anyhow::Result<()> {
    let caller = ctx.caller()?;
    let issues = ctx.tracker.reported_by(&caller)?;
    ReporterResult::new(issues, ctx.tracker.now()).render(ctx.mode);
    Ok(())
}

/// Admin work queue
pub fn queue(ctx: &Context, filter: &QueueFilter) -> anyhow::Result<()> {
    let caller = ctx.caller()?;
    if !caller.is_admin() {
        anyhow::bail!("{caller} is not allowed to view the admin queue");
    }

    let issues = ctx.tracker.admin_queue(filter)?;
    IssueList::new("Admin queue", issues, ctx.tracker.now()).render(ctx.mode);
    Ok(())
}

/// Resolved issues
pub fn resolved(ctx: &Context) -> anyhow::Result<()> {
    let issues = ctx.tracker.resolved()?;
    IssueList::new("Resolved issues", issues, ctx.tracker.now()).render(ctx.mode);
    Ok(())
}

/// Counts by status
pub fn stats(ctx: &Context) -> anyhow::Result<()> {
    StatsResult(ctx.tracker.stats()?).render(ctx.mode);
    Ok(())
}
