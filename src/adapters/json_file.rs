//! JSON file storage
//!
//! Keeps `issues.json` and `timeline.json` in a data directory. Every write
//! goes to a uniquely named temporary file first and is renamed into place.
//! Writers hold an exclusive lock on `.lock` in the data directory for the
//! whole load, check and save, so separate processes sharing a directory
//! serialize too. The revision check catches writers that read a stale copy.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use super::{guard_update, next_issue_id};
use crate::core::error::StoreError;
use crate::core::models::{Issue, TimelineEvent};
use crate::core::ports::{IssueStore, TimelineStore};

const ISSUES_FILE: &str = "issues.json";
const TIMELINE_FILE: &str = "timeline.json";
const LOCK_FILE: &str = ".lock";

/// Exclusive hold on the data directory, released on drop
struct DirLock {
    file: File,
}

impl Drop for DirLock {
    fn drop(&mut self) {
        // The lock file stays; removing it would let a waiter lock an orphaned inode.
        let _ = FileExt::unlock(&self.file);
    }
}

/// File-backed store rooted at a data directory
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (without creating) a store in `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Block until this caller is the only writer on the directory
    fn lock(&self) -> Result<DirLock, StoreError> {
        fs::create_dir_all(&self.dir)?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.dir.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        Ok(DirLock { file })
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StoreError> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save<T: Serialize>(&self, name: &str, records: &[T]) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(serde_json::to_string_pretty(records)?.as_bytes())?;
        tmp.persist(self.dir.join(name)).map_err(|e| e.error)?;
        Ok(())
    }
}

impl IssueStore for JsonFileStore {
    fn create(&self, mut issue: Issue) -> Result<Issue, StoreError> {
        issue.validate().map_err(StoreError::Invalid)?;
        let _guard = self.lock()?;
        let mut issues: Vec<Issue> = self.load(ISSUES_FILE)?;
        issue.id = next_issue_id(issues.iter().map(|i| i.id.as_str()));
        issue.revision = 0;
        issues.push(issue.clone());
        self.save(ISSUES_FILE, &issues)?;
        log::debug!("Created {} in {}", issue.id, self.dir.display());
        Ok(issue)
    }

    fn get(&self, id: &str) -> Result<Issue, StoreError> {
        self.load::<Issue>(ISSUES_FILE)?
            .into_iter()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn update(&self, issue: &Issue) -> Result<Issue, StoreError> {
        let _guard = self.lock()?;
        let mut issues: Vec<Issue> = self.load(ISSUES_FILE)?;
        let stored = issues
            .iter_mut()
            .find(|i| i.id == issue.id)
            .ok_or_else(|| StoreError::NotFound(issue.id.clone()))?;
        let next = guard_update(stored, issue)?;
        *stored = next.clone();
        self.save(ISSUES_FILE, &issues)?;
        Ok(next)
    }

    fn scan_all(&self) -> Result<Vec<Issue>, StoreError> {
        self.load(ISSUES_FILE)
    }
}

impl TimelineStore for JsonFileStore {
    fn append(&self, event: &TimelineEvent) -> Result<(), StoreError> {
        let _guard = self.lock()?;
        let mut events: Vec<TimelineEvent> = self.load(TIMELINE_FILE)?;
        events.push(event.clone());
        self.save(TIMELINE_FILE, &events)
    }

    fn for_issue(&self, issue_id: &str) -> Result<Vec<TimelineEvent>, StoreError> {
        let mut events: Vec<TimelineEvent> = self
            .load::<TimelineEvent>(TIMELINE_FILE)?
            .into_iter()
            .filter(|e| e.issue_id == issue_id)
            .collect();
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }
}
