//! Task (to-do item) types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{TaskId, UserId};

/// Errors that can occur when parsing a [`TaskTitle`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskTitleError {
    /// The title is empty once surrounding whitespace is removed.
    #[error("task title cannot be blank")]
    Blank,
}

/// A task title that is known not to be blank.
///
/// Whitespace-only input is rejected before it ever reaches the network.
///
/// ```
/// use ticklist_core::TaskTitle;
///
/// assert_eq!(TaskTitle::parse("  Buy milk ").unwrap().as_str(), "Buy milk");
/// assert!(TaskTitle::parse(" \t ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Parse a title from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTitleError::Blank`] if nothing is left after trimming.
    pub fn parse(input: &str) -> Result<Self, TaskTitleError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TaskTitleError::Blank);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A task as returned by the backend.
///
/// `ownerId` and `createdAt` are not sent by every backend build, so both are
/// optional here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, alias = "owner_id", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// The patch that flips this task's completion flag.
    #[must_use]
    pub const fn toggle_patch(&self) -> TaskPatch {
        TaskPatch::completed(!self.completed)
    }
}

/// Body of `POST /todos`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewTask {
    pub title: TaskTitle,
}

impl NewTask {
    #[must_use]
    pub const fn new(title: TaskTitle) -> Self {
        Self { title }
    }
}

/// Body of `PATCH /todos/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TaskTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// A patch that only renames the task.
    #[must_use]
    pub const fn rename(title: TaskTitle) -> Self {
        Self {
            title: Some(title),
            completed: None,
        }
    }

    /// A patch that only sets the completion flag.
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

/// Summary counters shown above the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    /// Count completed and pending tasks.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
        }
    }

    /// Completion percentage, rounded down. Zero for an empty list.
    #[must_use]
    pub const fn progress_percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        self.completed * 100 / self.total
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn task(id: i64, completed: bool) -> Task {
        Task {
            id: TaskId::new(id),
            title: format!("task {id}"),
            completed,
            owner_id: None,
            created_at: None,
        }
    }

    #[test]
    fn test_title_rejects_whitespace_only() {
        assert_eq!(TaskTitle::parse(""), Err(TaskTitleError::Blank));
        assert_eq!(TaskTitle::parse("  \n\t "), Err(TaskTitleError::Blank));
    }

    #[test]
    fn test_task_deserializes_camel_case() {
        let value = json!({
            "id": 7,
            "title": "Buy milk",
            "completed": false,
            "ownerId": 3,
            "createdAt": "2025-03-01T12:00:00Z"
        });
        let task: Task = serde_json::from_value(value).unwrap();
        assert_eq!(task.id, TaskId::new(7));
        assert_eq!(task.owner_id, Some(UserId::new(3)));
        assert!(task.created_at.is_some());
    }

    #[test]
    fn test_task_deserializes_minimal_shape() {
        let task: Task = serde_json::from_value(json!({"id": 1, "title": "x"})).unwrap();
        assert!(!task.completed);
        assert_eq!(task.owner_id, None);
        assert_eq!(task.created_at, None);
    }

    #[test]
    fn test_task_accepts_snake_case_aliases() {
        let task: Task =
            serde_json::from_value(json!({"id": 1, "title": "x", "owner_id": 4})).unwrap();
        assert_eq!(task.owner_id, Some(UserId::new(4)));
    }

    #[test]
    fn test_toggle_patch_flips_completion() {
        assert_eq!(task(1, false).toggle_patch(), TaskPatch::completed(true));
        assert_eq!(task(1, true).toggle_patch(), TaskPatch::completed(false));
    }

    #[test]
    fn test_patch_omits_absent_fields() {
        let body = serde_json::to_value(TaskPatch::completed(true)).unwrap();
        assert_eq!(body, json!({"completed": true}));
        assert_eq!(serde_json::to_value(TaskPatch::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_new_task_body() {
        let body = serde_json::to_value(NewTask::new(TaskTitle::parse(" Buy milk ").unwrap()))
            .unwrap();
        assert_eq!(body, json!({"title": "Buy milk"}));
    }

    #[test]
    fn test_stats_counts_and_progress() {
        let tasks = vec![task(1, true), task(2, false), task(3, false)];
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.progress_percent(), 33);
    }

    #[test]
    fn test_stats_empty_list() {
        let stats = TaskStats::from_tasks(&[]);
        assert_eq!(stats, TaskStats::default());
        assert_eq!(stats.progress_percent(), 0);
    }
}
