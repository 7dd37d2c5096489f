//! Centralized path definitions for campusfix
//!
//! This module provides a single source of truth for all filesystem paths used by campusfix.
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.config/campusfix/
//! └── config.toml               # Lifecycle, scheduler, access and storage settings
//!
//! ~/.local/share/campusfix/     # Default data_dir (platform data dir)
//! ├── issues.json               # Issue records
//! └── timeline.json             # Append-only audit events
//! ```
//!
//! The config location can be overridden with `--config` or `CAMPUSFIX_CONFIG`.

use std::ffi::OsString;
use std::path::PathBuf;

/// Application directory name under the platform config and data dirs
const APP_DIR: &str = "campusfix";

/// Config filename
const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the config file path
pub const CONFIG_ENV: &str = "CAMPUSFIX_CONFIG";

/// Get the config directory.
///
/// Returns `~/.config/campusfix/` on Linux.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Get the default config file path, honouring `CAMPUSFIX_CONFIG`.
#[must_use]
pub fn config_file() -> PathBuf {
    config_file_from(std::env::var_os(CONFIG_ENV))
}

/// Config file path given the value of `CAMPUSFIX_CONFIG`, if any.
#[must_use]
pub fn config_file_from(env_override: Option<OsString>) -> PathBuf {
    env_override
        .filter(|v| !v.is_empty())
        .map_or_else(|| config_dir().join(CONFIG_FILE), PathBuf::from)
}

/// Get the default data directory.
///
/// Holds `issues.json` and `timeline.json` unless `storage.data_dir` says otherwise.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
