use async_trait::async_trait;
use sqlx::PgPool;

use super::{TaskStore, TaskStoreError};
use crate::models::{NewTask, Task, TaskChanges, TaskFilter};

const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, created_at, updated_at";

/// `TaskStore` backed by the `tasks` table.
#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, user_id: i32, task: NewTask) -> Result<Task, TaskStoreError> {
        let created = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (user_id, title, description, status, priority, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list(&self, user_id: i32, filter: &TaskFilter) -> Result<Vec<Task>, TaskStoreError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks \
             WHERE user_id = $1 \
               AND ($2::task_status IS NULL OR status = $2) \
               AND ($3::task_priority IS NULL OR priority = $3) \
             ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .bind(filter.status)
        .bind(filter.priority)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn get(&self, user_id: i32, task_id: i32) -> Result<Option<Task>, TaskStoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update(
        &self,
        user_id: i32,
        task_id: i32,
        changes: TaskChanges,
    ) -> Result<Option<Task>, TaskStoreError> {
        let Some(mut task) = self.get(user_id, task_id).await? else {
            return Ok(None);
        };
        changes.apply(&mut task);

        let updated = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks \
             SET title = $3, description = $4, status = $5, priority = $6, due_date = $7, \
                 updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, user_id: i32, task_id: i32) -> Result<bool, TaskStoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
