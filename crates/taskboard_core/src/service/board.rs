//! Board facade and composition root.
//!
//! # Responsibility
//! - Load persisted state once and compose store, drag coordinator and view
//!   preferences.
//! - Persist board title and status filter changes immediately.
//! - Serve per-category projections under the active filter.
//!
//! # Invariants
//! - The persistence adapter is injected once, in `TaskBoard::open`.
//! - Drag gestures reach the store only as `ReassignCommand`s.

use crate::model::task::{Category, StatusFilter, Task};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::drag::{DragCoordinator, DragEvent, DragState};
use crate::service::persistence::PersistenceAdapter;
use crate::service::task_store::TaskStore;
use crate::service::view::project;
use log::info;

/// One rendered column: a category and its visible tasks in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    pub category: Category,
    pub tasks: Vec<&'a Task>,
}

pub struct TaskBoard<S: KeyValueStore> {
    store: TaskStore<S>,
    drag: DragCoordinator,
    board_title: String,
    status_filter: StatusFilter,
}

impl<S: KeyValueStore> TaskBoard<S> {
    /// Loads persisted state from `kv` and builds the board.
    pub fn open(kv: S) -> Self {
        let persistence = PersistenceAdapter::new(kv);
        let loaded = persistence.load();
        info!(
            "event=board_open module=board status=ok task_count={}",
            loaded.tasks.len()
        );

        Self {
            store: TaskStore::new(persistence, loaded.tasks),
            drag: DragCoordinator::new(),
            board_title: loaded.board_title,
            status_filter: loaded.status_filter,
        }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskStore<S> {
        &mut self.store
    }

    pub fn board_title(&self) -> &str {
        &self.board_title
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Renames the board. The title is trimmed; blank or unchanged titles are
    /// ignored and return `false`.
    pub fn rename(&mut self, title: &str) -> bool {
        let trimmed = title.trim();
        if trimmed.is_empty() || trimmed == self.board_title {
            return false;
        }

        self.board_title = trimmed.to_string();
        info!("event=board_rename module=board status=ok");
        if let Err(err) = self
            .store
            .persistence()
            .save_board_title(&self.board_title)
        {
            self.store.record_write_failure("board_rename", err);
        }
        true
    }

    /// Changes the active status filter and persists it.
    pub fn set_status_filter(&mut self, filter: StatusFilter) -> bool {
        if filter == self.status_filter {
            return false;
        }

        self.status_filter = filter;
        info!("event=board_filter module=board status=ok status_filter={filter}");
        if let Err(err) = self.store.persistence().save_status_filter(filter) {
            self.store.record_write_failure("board_filter", err);
        }
        true
    }

    /// Visible tasks of one category under the active filter.
    pub fn column(&self, category: Category) -> Vec<&Task> {
        project(self.store.tasks(), category, self.status_filter)
    }

    /// Every column in fixed board order.
    pub fn columns(&self) -> Vec<BoardColumn<'_>> {
        Category::ALL
            .into_iter()
            .map(|category| BoardColumn {
                category,
                tasks: self.column(category),
            })
            .collect()
    }

    /// Feeds a drag signal through the coordinator and applies any resulting
    /// reassignment. Returns `true` when a task changed category.
    pub fn handle_drag(&mut self, event: DragEvent) -> bool {
        match self.drag.handle(event, self.store.tasks()) {
            Some(command) => self
                .store
                .reassign_category(&command.task_id, command.category),
            None => false,
        }
    }
}
