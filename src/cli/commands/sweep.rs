//! Sweep and watch commands - verification window expiry

use campusfix::VerificationScheduler;
use campusfix::output::SweepResult;

use super::Context;

fn scheduler(ctx: &Context) -> VerificationScheduler {
    VerificationScheduler::new(ctx.tracker.clone()).with_interval(ctx.config.scheduler_interval())
}

/// Run one verification sweep
pub fn sweep(ctx: &Context) -> anyhow::Result<()> {
    let report = scheduler(ctx).sweep()?;
    SweepResult::from(report).render(ctx.mode);
    Ok(())
}

/// Run the scheduler until Ctrl-C
pub fn watch(ctx: &Context) -> anyhow::Result<()> {
    let scheduler = scheduler(ctx);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let handle = scheduler.spawn();
        let signal = tokio::signal::ctrl_c().await;
        handle.shutdown().await;
        signal
    })?;
    Ok(())
}
