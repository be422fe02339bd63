use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Completed,
}

/// Input structure for creating or updating a task.
///
/// Only these fields are read from a request body. Any owner field a client sends
/// (`user_id`, ...) is dropped during deserialization; ownership always comes from
/// the authenticated caller.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Defaults to `pending` on creation and leaves the stored status untouched on update.
    pub status: Option<TaskStatus>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: i64,
    /// The title of the task.
    pub title: String,
    /// Free-form description, empty when none was given.
    pub description: String,
    /// The current status of the task.
    pub status: TaskStatus,
    /// Identifier of the user who owns the task. Never changes after creation.
    pub user_id: i64,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

/// A task that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub user_id: i64,
}

impl NewTask {
    /// Builds a task owned by `owner_id`, whatever the input claims.
    pub fn new(input: TaskInput, owner_id: i64) -> Self {
        Self {
            title: input.title,
            description: input.description.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            user_id: owner_id,
        }
    }
}

/// The mutable fields of a task, fully resolved against the stored row.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl TaskChanges {
    pub fn new(input: TaskInput, current: &Task) -> Self {
        Self {
            title: input.title,
            description: input.description.unwrap_or_default(),
            status: input.status.unwrap_or(current.status),
        }
    }
}
