//! Configuration management
//!
//! Settings for the lifecycle engine, the verification scheduler, the
//! administrator list and the data directory. Stored as TOML at
//! `~/.config/campusfix/config.toml` unless overridden; every field has a
//! default so a missing file or section is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::models::{Caller, is_reserved_user_id};
use crate::core::services::lifecycle::{DEFAULT_VERIFICATION_WINDOW_HOURS, LifecyclePolicy};
use crate::paths;
use crate::tracker::DEFAULT_MAX_UPDATE_RETRIES;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Lifecycle tunables
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    /// Verification scheduler
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Who counts as an administrator
    #[serde(default)]
    pub access: AccessConfig,
    /// Where issue data lives
    #[serde(default)]
    pub storage: StorageConfig,
}

/// `[lifecycle]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Hours a reporter has to verify or dispute a resolution
    #[serde(default = "default_window_hours")]
    pub verification_window_hours: u32,
    /// Re-reads allowed after a revision conflict
    #[serde(default = "default_max_retries")]
    pub max_update_retries: u32,
}

const fn default_window_hours() -> u32 {
    DEFAULT_VERIFICATION_WINDOW_HOURS
}

const fn default_max_retries() -> u32 {
    DEFAULT_MAX_UPDATE_RETRIES
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            verification_window_hours: default_window_hours(),
            max_update_retries: default_max_retries(),
        }
    }
}

/// `[scheduler]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between verification sweeps
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

const fn default_interval_secs() -> u64 {
    60
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

/// `[access]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Administrator identities, compared case-insensitively
    #[serde(default = "default_admins")]
    pub admins: Vec<String>,
}

fn default_admins() -> Vec<String> {
    vec!["admin@campus.edu".to_string()]
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admins: default_admins(),
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory; the platform data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Default config file location
    #[must_use]
    pub fn default_path() -> PathBuf {
        paths::config_file()
    }

    /// Load config from `path`, or defaults if it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.lifecycle.verification_window_hours == 0 {
            anyhow::bail!("lifecycle.verification_window_hours must be at least 1");
        }
        if self.scheduler.interval_secs == 0 {
            anyhow::bail!("scheduler.interval_secs must be at least 1");
        }
        Ok(())
    }

    /// Whether `id` is listed as an administrator
    #[must_use]
    pub fn is_admin(&self, id: &str) -> bool {
        let id = id.trim();
        self.access.admins.iter().any(|a| a.trim().eq_ignore_ascii_case(id))
    }

    /// Caller identity for `id`, with its role looked up in `[access]`
    pub fn caller_for(&self, id: &str) -> anyhow::Result<Caller> {
        let id = id.trim();
        if is_reserved_user_id(id) {
            anyhow::bail!("{id} is reserved for the verification scheduler");
        }
        Ok(if self.is_admin(id) {
            Caller::admin(id)
        } else {
            Caller::member(id)
        })
    }

    /// Lifecycle policy built from `[lifecycle]`
    #[must_use]
    pub fn policy(&self) -> LifecyclePolicy {
        LifecyclePolicy::with_window_hours(self.lifecycle.verification_window_hours)
    }

    /// Sweep interval from `[scheduler]`
    #[must_use]
    pub const fn scheduler_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.interval_secs)
    }

    /// Resolved data directory
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(paths::data_dir)
    }
}
