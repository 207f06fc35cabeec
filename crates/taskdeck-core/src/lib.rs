//! Domain types & view derivation for taskdeck.

/// Label parsing errors.
pub mod error;
/// Status, priority and category enums.
pub mod fields;
/// Identifier types.
pub mod id;
/// Case-insensitive search over task text.
pub mod text_matcher;
/// Filtered, sorted projections and counters.
pub mod view;

pub use crate::error::ParseEnumError;
pub use crate::fields::{Category, Priority, Status};
pub use crate::id::TaskId;
pub use crate::text_matcher::TextMatcher;
pub use crate::view::{SortField, SortOrder, TaskQuery, TaskStats, TaskView};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Every user-editable field of a task.
///
/// This is the payload of create and update operations; identity and
/// timestamps are owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    /// Display title. Not validated here.
    pub title: String,
    /// Free-form notes, possibly empty.
    #[serde(default)]
    pub description: String,
    /// Progress state.
    #[serde(default)]
    pub status: Status,
    /// Importance.
    #[serde(default)]
    pub priority: Priority,
    /// Grouping.
    #[serde(default)]
    pub category: Category,
    /// Optional deadline.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
}

impl TaskFields {
    /// Fields with the given title and defaults for everything else.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A single trackable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier assigned at creation.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Free-form notes.
    pub description: String,
    /// Progress state.
    pub status: Status,
    /// Importance.
    pub priority: Priority,
    /// Grouping.
    pub category: Category,
    /// Optional deadline.
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    /// Creation time; never changes.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Time of the latest mutation.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Task {
    /// Build a task from its fields with both timestamps set to `now`.
    #[must_use]
    pub fn new(id: TaskId, fields: TaskFields, now: OffsetDateTime) -> Self {
        let TaskFields {
            title,
            description,
            status,
            priority,
            category,
            due_date,
        } = fields;
        Self {
            id,
            title,
            description,
            status,
            priority,
            category,
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of the user-editable fields, e.g. to pre-fill an edit form.
    #[must_use]
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            category: self.category,
            due_date: self.due_date,
        }
    }

    /// Replace every editable field. `id` and `created_at` are untouched.
    pub fn replace_fields(&mut self, fields: TaskFields, now: OffsetDateTime) {
        let TaskFields {
            title,
            description,
            status,
            priority,
            category,
            due_date,
        } = fields;
        self.title = title;
        self.description = description;
        self.status = status;
        self.priority = priority;
        self.category = category;
        self.due_date = due_date;
        self.touch(now);
    }

    /// Change only the status.
    pub fn set_status(&mut self, status: Status, now: OffsetDateTime) {
        self.status = status;
        self.touch(now);
    }

    // updated_at must never fall behind created_at, even if the clock steps back.
    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now.max(self.created_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn new_task_has_equal_timestamps() {
        let now = datetime!(2025-01-01 09:00 UTC);
        let task = Task::new(TaskId::new(), TaskFields::titled("Write report"), now);
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
        assert_eq!(task.status, Status::Pending);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, Category::Personal);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn replace_fields_keeps_identity() {
        let created = datetime!(2025-01-01 09:00 UTC);
        let mut task = Task::new(TaskId::new(), TaskFields::titled("Draft"), created);
        let id = task.id;

        let later = datetime!(2025-01-02 09:00 UTC);
        task.replace_fields(
            TaskFields {
                title: "Final".into(),
                description: "ship it".into(),
                status: Status::Ongoing,
                priority: Priority::High,
                category: Category::Work,
                due_date: Some(datetime!(2025-02-01 00:00 UTC)),
            },
            later,
        );

        assert_eq!(task.id, id);
        assert_eq!(task.created_at, created);
        assert_eq!(task.updated_at, later);
        assert_eq!(task.title, "Final");
        assert_eq!(task.fields().priority, Priority::High);
    }

    #[test]
    fn touch_never_moves_before_creation() {
        let created = datetime!(2025-01-01 09:00 UTC);
        let mut task = Task::new(TaskId::new(), TaskFields::titled("Clock skew"), created);
        task.set_status(Status::Completed, datetime!(2024-12-31 09:00 UTC));
        assert_eq!(task.updated_at, created);
        assert_eq!(task.status, Status::Completed);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let task = Task::new(
            TaskId::new(),
            TaskFields::titled("Serialize"),
            datetime!(2025-01-01 09:00 UTC),
        );
        let value = serde_json::to_value(&task)
            .unwrap_or_else(|err| panic!("must serialize task: {err}"));
        assert_eq!(value["dueDate"], serde_json::Value::Null);
        assert_eq!(value["createdAt"], "2025-01-01T09:00:00Z");
        assert_eq!(value["status"], "pending");
    }
}
