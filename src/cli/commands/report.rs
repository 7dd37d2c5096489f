//! Report command - file a new issue

use campusfix::core::models::{NewIssue, Visibility};
use campusfix::output::{IssueResult, IssueView};

use super::Context;

/// Fields of a new report
#[derive(Debug)]
pub struct ReportArgs {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub private: bool,
    pub image: Option<String>,
}

/// File a new issue as the acting user
pub fn report(ctx: &Context, args: ReportArgs) -> anyhow::Result<()> {
    let caller = ctx.caller()?;
    let new = NewIssue {
        title: args.title,
        description: args.description,
        category: args.category,
        location: args.location,
        visibility: if args.private {
            Visibility::Private
        } else {
            Visibility::Public
        },
        image_ref: args.image.filter(|i| !i.trim().is_empty()),
    };

    let mutation = ctx.tracker.create_issue(new, &caller)?;
    IssueResult {
        action: "Reported".to_string(),
        changed: mutation.changed,
        timeline_warning: mutation.timeline_failure.map(|f| f.to_string()),
        issue: IssueView::new(mutation.issue, ctx.tracker.now()),
    }
    .render(ctx.mode);
    Ok(())
}
