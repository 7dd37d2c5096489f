//! In-memory issue and timeline storage
//!
//! Backs tests and short-lived processes. Same compare-and-swap semantics
//! as the file store.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{guard_update, next_issue_id};
use crate::core::error::StoreError;
use crate::core::models::{Issue, TimelineEvent};
use crate::core::ports::{IssueStore, TimelineStore};

#[derive(Debug, Default)]
struct Tables {
    issues: HashMap<String, Issue>,
    timeline: Vec<TimelineEvent>,
}

/// Issues and timeline held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

impl IssueStore for MemoryStore {
    fn create(&self, mut issue: Issue) -> Result<Issue, StoreError> {
        issue.validate().map_err(StoreError::Invalid)?;
        let mut tables = self.write()?;
        issue.id = next_issue_id(tables.issues.keys().map(String::as_str));
        issue.revision = 0;
        tables.issues.insert(issue.id.clone(), issue.clone());
        Ok(issue)
    }

    fn get(&self, id: &str) -> Result<Issue, StoreError> {
        self.read()?
            .issues
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn update(&self, issue: &Issue) -> Result<Issue, StoreError> {
        let mut tables = self.write()?;
        let stored = tables
            .issues
            .get_mut(&issue.id)
            .ok_or_else(|| StoreError::NotFound(issue.id.clone()))?;
        let next = guard_update(stored, issue)?;
        *stored = next.clone();
        Ok(next)
    }

    fn scan_all(&self) -> Result<Vec<Issue>, StoreError> {
        Ok(self.read()?.issues.values().cloned().collect())
    }
}

impl TimelineStore for MemoryStore {
    fn append(&self, event: &TimelineEvent) -> Result<(), StoreError> {
        self.write()?.timeline.push(event.clone());
        Ok(())
    }

    fn for_issue(&self, issue_id: &str) -> Result<Vec<TimelineEvent>, StoreError> {
        let mut events: Vec<TimelineEvent> = self
            .read()?
            .timeline
            .iter()
            .filter(|e| e.issue_id == issue_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }
}
