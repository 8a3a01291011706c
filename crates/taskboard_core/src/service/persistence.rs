//! Board persistence adapter.
//!
//! # Responsibility
//! - Load the task collection and view preferences once at startup.
//! - Write the full collection through to durable storage after mutations.
//!
//! # Invariants
//! - Loading never fails: absent or corrupt keys yield field-level defaults.
//! - Corrupt values are discarded outright and their key is removed.
//! - An empty collection is stored by removing the `tasks` key.
//! - Log lines carry metadata only, never task text.

use crate::model::task::{StatusFilter, Task};
use crate::repo::kv_repo::{KeyValueStore, StorageError};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TASKS_KEY: &str = "tasks";
pub const BOARD_TITLE_KEY: &str = "boardTitle";
pub const STATUS_FILTER_KEY: &str = "statusFilter";
pub const DEFAULT_BOARD_TITLE: &str = "My Tasks";

/// Durable write that did not complete. In-memory state stays authoritative.
#[derive(Debug)]
pub enum PersistenceError {
    Write {
        key: &'static str,
        source: StorageError,
    },
    Encode(serde_json::Error),
}

impl PersistenceError {
    /// Storage key the failed write targeted.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Write { key, .. } => key,
            Self::Encode(_) => TASKS_KEY,
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write { key, source } => write!(f, "failed to write `{key}`: {source}"),
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Write { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

/// Everything restored at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBoard {
    pub tasks: Vec<Task>,
    pub board_title: String,
    pub status_filter: StatusFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CorruptTasks {
    Malformed,
    EmptyTitle,
    DuplicateId,
}

impl CorruptTasks {
    fn code(self) -> &'static str {
        match self {
            Self::Malformed => "malformed_json",
            Self::EmptyTitle => "empty_title",
            Self::DuplicateId => "duplicate_id",
        }
    }
}

/// Adapter between board services and a `KeyValueStore`.
pub struct PersistenceAdapter<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store, for callers that composed the adapter.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads tasks, board title and status filter, substituting defaults.
    pub fn load(&self) -> LoadedBoard {
        let loaded = LoadedBoard {
            tasks: self.load_tasks(),
            board_title: self.load_board_title(),
            status_filter: self.load_status_filter(),
        };
        info!(
            "event=persistence_load module=persistence status=ok task_count={} status_filter={}",
            loaded.tasks.len(),
            loaded.status_filter
        );
        loaded
    }

    /// Serializes and writes the entire collection.
    ///
    /// # Errors
    /// - `Write` when the store refuses the write or removal.
    /// - `Encode` when serialization fails.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        if tasks.is_empty() {
            return self.remove(TASKS_KEY);
        }

        let encoded = serde_json::to_string(tasks).map_err(PersistenceError::Encode)?;
        self.write(TASKS_KEY, &encoded)?;
        debug!(
            "event=persistence_save module=persistence status=ok key={TASKS_KEY} task_count={}",
            tasks.len()
        );
        Ok(())
    }

    pub fn save_board_title(&self, title: &str) -> Result<(), PersistenceError> {
        self.write(BOARD_TITLE_KEY, title)
    }

    pub fn save_status_filter(&self, filter: StatusFilter) -> Result<(), PersistenceError> {
        self.write(STATUS_FILTER_KEY, filter.as_str())
    }

    fn load_tasks(&self) -> Vec<Task> {
        let Some(raw) = self.read(TASKS_KEY) else {
            return Vec::new();
        };

        match decode_tasks(&raw) {
            Ok(tasks) => tasks,
            Err(reason) => {
                warn!(
                    "event=persistence_load module=persistence status=corrupt key={TASKS_KEY} error_code={}",
                    reason.code()
                );
                self.discard(TASKS_KEY);
                Vec::new()
            }
        }
    }

    fn load_board_title(&self) -> String {
        match self.read(BOARD_TITLE_KEY) {
            Some(title) if !title.trim().is_empty() => title,
            _ => DEFAULT_BOARD_TITLE.to_string(),
        }
    }

    fn load_status_filter(&self) -> StatusFilter {
        let Some(raw) = self.read(STATUS_FILTER_KEY) else {
            return StatusFilter::default();
        };

        StatusFilter::from_stored(&raw).unwrap_or_else(|| {
            warn!(
                "event=persistence_load module=persistence status=corrupt key={STATUS_FILTER_KEY} error_code=unknown_filter"
            );
            self.discard(STATUS_FILTER_KEY);
            StatusFilter::default()
        })
    }

    fn read(&self, key: &'static str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                error!(
                    "event=persistence_load module=persistence status=error key={key} error_code=read_failed error={err}"
                );
                None
            }
        }
    }

    fn discard(&self, key: &'static str) {
        if let Err(err) = self.store.remove(key) {
            error!(
                "event=persistence_discard module=persistence status=error key={key} error_code=remove_failed error={err}"
            );
        }
    }

    fn write(&self, key: &'static str, value: &str) -> Result<(), PersistenceError> {
        self.store
            .set(key, value)
            .map_err(|source| PersistenceError::Write { key, source })
    }

    fn remove(&self, key: &'static str) -> Result<(), PersistenceError> {
        self.store
            .remove(key)
            .map_err(|source| PersistenceError::Write { key, source })
    }
}

fn decode_tasks(raw: &str) -> Result<Vec<Task>, CorruptTasks> {
    let tasks: Vec<Task> = serde_json::from_str(raw).map_err(|_| CorruptTasks::Malformed)?;

    if tasks.iter().any(|task| task.title.trim().is_empty()) {
        return Err(CorruptTasks::EmptyTitle);
    }

    let mut seen = HashSet::with_capacity(tasks.len());
    if !tasks.iter().all(|task| seen.insert(&task.id)) {
        return Err(CorruptTasks::DuplicateId);
    }

    Ok(tasks)
}
