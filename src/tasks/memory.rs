use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{TaskStore, TaskStoreError};
use crate::models::{NewTask, Task, TaskChanges, TaskFilter};

#[derive(Default)]
struct Records {
    last_id: i32,
    tasks: Vec<Task>,
}

/// A `TaskStore` kept in process memory. Ids start at 1.
#[derive(Default)]
pub struct InMemoryTaskStore {
    records: Mutex<Records>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, TaskStoreError> {
        self.records
            .lock()
            .map_err(|_| TaskStoreError::Storage("task store lock poisoned".into()))
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, user_id: i32, task: NewTask) -> Result<Task, TaskStoreError> {
        let mut records = self.lock()?;
        records.last_id += 1;
        let now = Utc::now();
        let created = Task {
            id: records.last_id,
            user_id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            created_at: now,
            updated_at: now,
        };
        records.tasks.push(created.clone());
        Ok(created)
    }

    async fn list(&self, user_id: i32, filter: &TaskFilter) -> Result<Vec<Task>, TaskStoreError> {
        let records = self.lock()?;
        let mut tasks: Vec<Task> = records
            .tasks
            .iter()
            .filter(|task| task.user_id == user_id && filter.matches(task))
            .cloned()
            .collect();
        // Ids break ties between tasks created within the same clock tick.
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn get(&self, user_id: i32, task_id: i32) -> Result<Option<Task>, TaskStoreError> {
        Ok(self
            .lock()?
            .tasks
            .iter()
            .find(|task| task.id == task_id && task.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        user_id: i32,
        task_id: i32,
        changes: TaskChanges,
    ) -> Result<Option<Task>, TaskStoreError> {
        let mut records = self.lock()?;
        let Some(task) = records
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id && task.user_id == user_id)
        else {
            return Ok(None);
        };
        changes.apply(task);
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete(&self, user_id: i32, task_id: i32) -> Result<bool, TaskStoreError> {
        let mut records = self.lock()?;
        let before = records.tasks.len();
        records
            .tasks
            .retain(|task| !(task.id == task_id && task.user_id == user_id));
        Ok(records.tasks.len() != before)
    }
}
