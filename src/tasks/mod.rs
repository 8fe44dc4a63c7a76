//! Per-user task storage.
//!
//! Every operation takes the owning user's id, which the routes obtain from the auth
//! gateway and never from the request. A task that belongs to someone else is
//! indistinguishable from one that does not exist.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewTask, Task, TaskChanges, TaskFilter};

pub use memory::InMemoryTaskStore;
pub use postgres::PgTaskStore;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskStoreError {
    #[error("task storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for TaskStoreError {
    fn from(error: sqlx::Error) -> Self {
        TaskStoreError::Storage(error.to_string())
    }
}

#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    async fn create(&self, user_id: i32, task: NewTask) -> Result<Task, TaskStoreError>;

    /// Tasks owned by `user_id` matching `filter`, newest first.
    async fn list(&self, user_id: i32, filter: &TaskFilter) -> Result<Vec<Task>, TaskStoreError>;

    async fn get(&self, user_id: i32, task_id: i32) -> Result<Option<Task>, TaskStoreError>;

    /// Returns `None` when the task does not exist or is not owned by `user_id`.
    async fn update(
        &self,
        user_id: i32,
        task_id: i32,
        changes: TaskChanges,
    ) -> Result<Option<Task>, TaskStoreError>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, user_id: i32, task_id: i32) -> Result<bool, TaskStoreError>;
}
