//! Drag gesture interpretation.
//!
//! # Responsibility
//! - Turn drag-start/drop messages into at most one category reassignment.
//!
//! # Invariants
//! - Only the source task id is captured at drag start; the task's current
//!   category is read from the snapshot at drop time.
//! - Drop targets are validated against the fixed category identifiers.
//! - One resolved gesture yields at most one `ReassignCommand`.

use crate::model::task::{Category, Task, TaskId};
use log::{debug, warn};

/// Signals delivered by the drag-and-drop facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start {
        task_id: TaskId,
    },
    /// `target: None` means the gesture ended outside any drop target.
    Drop {
        task_id: TaskId,
        target: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(TaskId),
    /// Last gesture finished; a new `Start` begins the next one.
    Resolved,
}

/// Category change the store should apply for a finished gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignCommand {
    pub task_id: TaskId,
    pub category: Category,
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Advances the gesture and returns the reassignment to apply, if any.
    pub fn handle(&mut self, event: DragEvent, tasks: &[Task]) -> Option<ReassignCommand> {
        match event {
            DragEvent::Start { task_id } => {
                if let DragState::Dragging(previous) = &self.state {
                    debug!(
                        "event=drag_start module=drag status=replaced previous_task_id={previous}"
                    );
                }
                debug!("event=drag_start module=drag status=ok task_id={task_id}");
                self.state = DragState::Dragging(task_id);
                None
            }
            DragEvent::Drop { task_id, target } => {
                let source = match std::mem::take(&mut self.state) {
                    DragState::Dragging(source) => source,
                    not_dragging => {
                        self.state = not_dragging;
                        debug!(
                            "event=drag_drop module=drag status=skipped reason=not_dragging task_id={task_id}"
                        );
                        return None;
                    }
                };
                self.state = DragState::Resolved;
                if source != task_id {
                    warn!(
                        "event=drag_drop module=drag status=mismatch source_task_id={source} drop_task_id={task_id}"
                    );
                }
                resolve_drop(source, target.as_deref(), tasks)
            }
        }
    }
}

fn resolve_drop(source: TaskId, target: Option<&str>, tasks: &[Task]) -> Option<ReassignCommand> {
    let Some(target) = target else {
        debug!("event=drag_drop module=drag status=aborted task_id={source}");
        return None;
    };
    let Some(category) = Category::from_drop_target(target) else {
        debug!("event=drag_drop module=drag status=skipped reason=not_a_column task_id={source}");
        return None;
    };
    let Some(task) = tasks.iter().find(|task| task.id == source) else {
        debug!("event=drag_drop module=drag status=skipped reason=unknown_id task_id={source}");
        return None;
    };
    if task.category == category {
        debug!("event=drag_drop module=drag status=skipped reason=same_column task_id={source}");
        return None;
    }

    debug!("event=drag_drop module=drag status=ok task_id={source} to={category}");
    Some(ReassignCommand {
        task_id: source,
        category,
    })
}
