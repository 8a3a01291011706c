//! Authoritative task collection.
//!
//! # Responsibility
//! - Own the task collection and apply create/edit/status/category/delete
//!   mutations.
//! - Write the whole collection through the persistence adapter after every
//!   applied mutation.
//! - Gate deletion behind an explicit request/confirm handshake.
//!
//! # Invariants
//! - Task ids are unique within the collection at all times.
//! - `id` and `created_at` never change after creation.
//! - Operations on unknown ids are silent no-ops and do not write.
//! - A failed write never rolls back the in-memory mutation.

use crate::model::draft::TaskFields;
use crate::model::task::{Category, Task, TaskId, TaskStatus};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::persistence::{PersistenceAdapter, PersistenceError};
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use uuid::Uuid;

/// Proof that deletion of one task was requested and is awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteToken {
    task_id: TaskId,
    nonce: Uuid,
}

impl DeleteToken {
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }
}

/// Single-writer owner of the task collection.
pub struct TaskStore<S: KeyValueStore> {
    tasks: Vec<Task>,
    persistence: PersistenceAdapter<S>,
    pending_delete: Option<DeleteToken>,
    last_write_failure: Option<PersistenceError>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Creates a store over an already-loaded collection.
    pub fn new(persistence: PersistenceAdapter<S>, tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            persistence,
            pending_delete: None,
            last_write_failure: None,
        }
    }

    /// Read-only snapshot in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    /// Appends a new pending task created now.
    pub fn create(&mut self, fields: TaskFields) -> Task {
        self.create_at(fields, Utc::now())
    }

    /// Appends a new pending task with an explicit creation time.
    pub fn create_at(&mut self, fields: TaskFields, created_at: DateTime<Utc>) -> Task {
        let mut id = TaskId::generate();
        while self.get(&id).is_some() {
            id = TaskId::generate();
        }

        let task = Task::with_id(id, fields, created_at);
        self.tasks.push(task.clone());
        info!(
            "event=task_create module=task_store status=ok task_id={} category={} priority={}",
            task.id, task.category, task.priority
        );
        self.persist("task_create");
        task
    }

    /// Replaces every editable field of `id`; `status` and `created_at` are kept.
    ///
    /// Returns `false` when `id` is unknown.
    pub fn update(&mut self, id: &TaskId, fields: TaskFields) -> bool {
        let Some(task) = self.find_mut(id) else {
            return Self::unknown("task_update", id);
        };

        task.apply_fields(fields);
        info!("event=task_update module=task_store status=ok task_id={id}");
        self.persist("task_update");
        true
    }

    /// Sets the status of `id`.
    ///
    /// Returns `false` when `id` is unknown or already has `status`.
    pub fn toggle_status(&mut self, id: &TaskId, status: TaskStatus) -> bool {
        let Some(task) = self.find_mut(id) else {
            return Self::unknown("task_toggle", id);
        };
        if task.status == status {
            return false;
        }

        task.status = status;
        info!("event=task_toggle module=task_store status=ok task_id={id} task_status={status}");
        self.persist("task_toggle");
        true
    }

    /// Flips `pending` and `completed`, returning the new status.
    pub fn flip_status(&mut self, id: &TaskId) -> Option<TaskStatus> {
        let next = self.get(id)?.status.toggled();
        self.toggle_status(id, next);
        Some(next)
    }

    /// Moves `id` to another category.
    ///
    /// Returns `false` when `id` is unknown or already in `category`.
    pub fn reassign_category(&mut self, id: &TaskId, category: Category) -> bool {
        let Some(task) = self.find_mut(id) else {
            return Self::unknown("task_reassign", id);
        };
        if task.category == category {
            return false;
        }

        let from = task.category;
        task.category = category;
        info!("event=task_reassign module=task_store status=ok task_id={id} from={from} to={category}");
        self.persist("task_reassign");
        true
    }

    /// Removes `id`. Returns `false` when `id` is unknown.
    pub fn delete(&mut self, id: &TaskId) -> bool {
        let Some(index) = self.tasks.iter().position(|task| &task.id == id) else {
            return Self::unknown("task_delete", id);
        };

        self.tasks.remove(index);
        if self
            .pending_delete
            .as_ref()
            .is_some_and(|token| &token.task_id == id)
        {
            self.pending_delete = None;
        }
        info!("event=task_delete module=task_store status=ok task_id={id}");
        self.persist("task_delete");
        true
    }

    /// Starts the delete handshake for `id`, replacing any earlier request.
    ///
    /// Returns `None` when `id` is unknown.
    pub fn request_delete(&mut self, id: &TaskId) -> Option<DeleteToken> {
        self.get(id)?;
        let token = DeleteToken {
            task_id: id.clone(),
            nonce: Uuid::new_v4(),
        };
        self.pending_delete = Some(token.clone());
        debug!("event=task_delete_request module=task_store status=pending task_id={id}");
        Some(token)
    }

    /// Completes the handshake. Only the latest outstanding token is honored.
    pub fn confirm_delete(&mut self, token: &DeleteToken) -> bool {
        if self.pending_delete.as_ref() != Some(token) {
            debug!(
                "event=task_delete_confirm module=task_store status=skipped reason=stale_token task_id={}",
                token.task_id
            );
            return false;
        }

        self.pending_delete = None;
        self.delete(&token.task_id)
    }

    /// Drops the outstanding delete request, if any.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn pending_delete(&self) -> Option<&DeleteToken> {
        self.pending_delete.as_ref()
    }

    /// Most recent write failure not yet taken by the caller.
    pub fn last_write_failure(&self) -> Option<&PersistenceError> {
        self.last_write_failure.as_ref()
    }

    pub fn take_write_failure(&mut self) -> Option<PersistenceError> {
        self.last_write_failure.take()
    }

    pub(crate) fn record_write_failure(&mut self, event: &'static str, err: PersistenceError) {
        error!(
            "event={event} module=task_store status=error error_code=persist_failed key={} error={err}",
            err.key()
        );
        self.last_write_failure = Some(err);
    }

    fn persist(&mut self, event: &'static str) {
        if let Err(err) = self.persistence.save_tasks(&self.tasks) {
            self.record_write_failure(event, err);
        }
    }

    fn find_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| &task.id == id)
    }

    fn unknown(event: &'static str, id: &TaskId) -> bool {
        debug!("event={event} module=task_store status=skipped reason=unknown_id task_id={id}");
        false
    }
}
