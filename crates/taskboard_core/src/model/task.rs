//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted under the `tasks` key.
//! - Define the closed enums for category, priority, status and view filter.
//! - Derive presentation-neutral facts (due urgency) from a task.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused within a board.
//! - `created_at` is set once at creation and never changes afterwards.
//! - `category`, `priority` and `status` always hold a closed-enum value.
//!
//! # See also
//! - `model::draft` for the creation/edit boundary.

use crate::model::draft::TaskFields;
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque, unique task identifier.
///
/// New ids are UUID v4 strings. Ids loaded from older boards (for example
/// decimal epoch strings) are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Error returned when text does not name a closed-enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseValueError {
    kind: &'static str,
    value: String,
}

impl Display for ParseValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for ParseValueError {}

/// Fixed board column a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Other,
}

impl Category {
    /// Every category in board column order.
    pub const ALL: [Category; 3] = [Category::Work, Category::Personal, Category::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Other => "Other",
        }
    }

    /// Resolves a drop-target identifier delivered by the drag facility.
    ///
    /// Only the exact column identifiers are accepted; anything else (for
    /// example the id of a task card the pointer was released over) is not
    /// a drop target.
    pub fn from_drop_target(target: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == target)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseValueError;

    /// Case-insensitive parse for human input.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseValueError {
                kind: "category",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseValueError {
                kind: "priority",
                value: value.to_string(),
            })
    }
}

/// Completion state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Returns the opposite status.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// View-level predicate narrowing which tasks are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Strict parse of the persisted representation.
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == TaskStatus::Pending,
            Self::Completed => status == TaskStatus::Completed,
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_stored(value.trim().to_ascii_lowercase().as_str()).ok_or_else(|| {
            ParseValueError {
                kind: "status filter",
                value: value.to_string(),
            }
        })
    }
}

/// How close a task's due date is, relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueUrgency {
    /// Due today or already overdue.
    Urgent,
    /// Due within the next two days.
    Approaching,
    Comfortable,
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Serialized as `YYYY-MM-DD`, or an empty string when unset.
    #[serde(default, with = "due_date_text")]
    pub due_date: Option<NaiveDate>,
    pub category: Category,
    pub priority: Priority,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new pending task from validated fields.
    ///
    /// `created_at` is truncated to millisecond precision so the persisted
    /// timestamp matches what older boards stored.
    pub fn new(fields: TaskFields, created_at: DateTime<Utc>) -> Self {
        Self::with_id(TaskId::generate(), fields, created_at)
    }

    /// Builds a new pending task with a caller-provided id.
    pub fn with_id(id: TaskId, fields: TaskFields, created_at: DateTime<Utc>) -> Self {
        let mut task = Self {
            id,
            title: String::new(),
            description: String::new(),
            due_date: None,
            category: Category::Work,
            priority: Priority::High,
            status: TaskStatus::Pending,
            created_at: created_at.trunc_subsecs(3),
        };
        task.apply_fields(fields);
        task
    }

    /// Replaces every editable field. `id`, `status` and `created_at` are kept.
    pub fn apply_fields(&mut self, fields: TaskFields) {
        let (title, description, due_date, category, priority) = fields.into_parts();
        self.title = title;
        self.description = description;
        self.due_date = Some(due_date);
        self.category = category;
        self.priority = priority;
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Classifies the due date relative to `today`. `None` without a due date.
    pub fn due_urgency(&self, today: NaiveDate) -> Option<DueUrgency> {
        let due = self.due_date?;
        let days = (due - today).num_days();
        Some(if days <= 0 {
            DueUrgency::Urgent
        } else if days <= 2 {
            DueUrgency::Approaching
        } else {
            DueUrgency::Comfortable
        })
    }
}

mod due_date_text {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;
        match text.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => NaiveDate::parse_from_str(value, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
