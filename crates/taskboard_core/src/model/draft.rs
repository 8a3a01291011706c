//! Creation/edit form boundary.
//!
//! # Responsibility
//! - Model raw form input (`TaskDraft`) including the defaults of a new task.
//! - Validate drafts into `TaskFields`, the only shape `TaskStore` accepts.
//!
//! # Invariants
//! - A `TaskFields` value always has a non-blank title and a due date.
//! - Validation never touches storage; rejected drafts create nothing.

use crate::model::task::{Category, Priority, Task};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Reason a draft was rejected before reaching the task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    MissingDueDate,
    /// Due date text is not a `YYYY-MM-DD` calendar date.
    InvalidDueDate(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::MissingDueDate => write!(f, "task due date is required"),
            Self::InvalidDueDate(value) => {
                write!(f, "invalid due date `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Validated editable fields of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    title: String,
    description: String,
    due_date: NaiveDate,
    category: Category,
    priority: Priority,
}

impl TaskFields {
    /// # Errors
    /// - `EmptyTitle` when `title` is blank after trimming.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        category: Category,
        priority: Priority,
    ) -> Result<Self, TaskValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        Ok(Self {
            title,
            description: description.into(),
            due_date,
            category,
            priority,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub(crate) fn into_parts(self) -> (String, String, NaiveDate, Category, Priority) {
        (
            self.title,
            self.description,
            self.due_date,
            self.category,
            self.priority,
        )
    }
}

/// Raw form state as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD` text, empty when the user cleared it.
    pub due_date: String,
    pub category: Category,
    pub priority: Priority,
}

impl TaskDraft {
    /// Blank draft for a new task: due today, `Work`, `High`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: today.format(DUE_DATE_FORMAT).to_string(),
            category: Category::Work,
            priority: Priority::High,
        }
    }

    /// Draft pre-filled from an existing task for editing.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task
                .due_date
                .map(|date| date.format(DUE_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            category: task.category,
            priority: task.priority,
        }
    }

    /// Validates the draft into store-ready fields.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `MissingDueDate` when the due date is empty.
    /// - `InvalidDueDate` when the due date is not `YYYY-MM-DD`.
    pub fn validate(&self) -> Result<TaskFields, TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        let due_text = self.due_date.trim();
        if due_text.is_empty() {
            return Err(TaskValidationError::MissingDueDate);
        }
        let due_date = NaiveDate::parse_from_str(due_text, DUE_DATE_FORMAT)
            .map_err(|_| TaskValidationError::InvalidDueDate(due_text.to_string()))?;

        TaskFields::new(
            self.title.clone(),
            self.description.clone(),
            due_date,
            self.category,
            self.priority,
        )
    }
}
