//! Command implementations

mod config;
mod issue;
mod listing;
mod report;
mod sweep;

use std::path::Path;
use std::sync::Arc;

use campusfix::adapters::{JsonFileStore, SystemClock};
use campusfix::core::models::Caller;
use campusfix::output::OutputMode;
use campusfix::{Config, IssueTracker};

pub use config::config;
pub use issue::{me_too, reopen, resolve, set_status, show, timeline, verify};
pub use listing::{feed, mine, queue, resolved, stats};
pub use report::{ReportArgs, report};
pub use sweep::{sweep, watch};

/// Configuration, tracker and acting user for one invocation
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub tracker: Arc<IssueTracker>,
    pub user: Option<String>,
    pub mode: OutputMode,
}

impl Context {
    /// Load config and open the file store it points at
    pub fn open(
        config_path: &Path,
        user: Option<String>,
        mode: OutputMode,
    ) -> anyhow::Result<Self> {
        let config = Config::load(config_path)?;
        let data_dir = config.data_dir();
        log::debug!("Using data directory {}", data_dir.display());

        let store = Arc::new(JsonFileStore::new(data_dir));
        let tracker = IssueTracker::new(store.clone(), store, Arc::new(SystemClock))
            .with_policy(config.policy())
            .with_max_retries(config.lifecycle.max_update_retries);

        Ok(Self {
            config,
            tracker: Arc::new(tracker),
            user: user.filter(|u| !u.trim().is_empty()),
            mode,
        })
    }

    /// The acting user, with the admin role if configured
    pub fn caller(&self) -> anyhow::Result<Caller> {
        match &self.user {
            Some(id) => self.config.caller_for(id),
            None => {
                anyhow::bail!("This command needs a user: pass --as <user> or set CAMPUSFIX_USER")
            },
        }
    }
}
