//! Core task-state engine for the personal task board.
//! This crate is the single source of truth for board invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::draft::{TaskDraft, TaskFields, TaskValidationError};
pub use model::task::{
    Category, DueUrgency, ParseValueError, Priority, StatusFilter, Task, TaskId, TaskStatus,
};
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use service::board::{BoardColumn, TaskBoard};
pub use service::drag::{DragCoordinator, DragEvent, DragState, ReassignCommand};
pub use service::persistence::{
    LoadedBoard, PersistenceAdapter, PersistenceError, DEFAULT_BOARD_TITLE,
};
pub use service::task_store::{DeleteToken, TaskStore};
pub use service::view::project;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
