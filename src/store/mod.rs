//! Persistence seam for users and tasks.
//!
//! Handlers and services only see the `UserStore` / `TaskStore` traits. Uniqueness of
//! usernames and emails, and the owner filter on task updates and deletes, are enforced
//! here so they hold atomically.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewTask, NewUser, Task, TaskChanges, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint (username or email) rejected the write.
    #[error("unique constraint violated")]
    Duplicate,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user, failing with `StoreError::Duplicate` if the username or email is taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, new_task: NewTask) -> Result<Task, StoreError>;

    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, StoreError>;

    /// All tasks owned by `owner_id`, newest first.
    async fn list_tasks_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError>;

    /// Applies `changes` only if the task exists and belongs to `owner_id`.
    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError>;

    /// Deletes the task only if it belongs to `owner_id`. Returns whether a row was removed.
    async fn delete_task(&self, id: i64, owner_id: i64) -> Result<bool, StoreError>;
}
