use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;
use crate::validation::first_message;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum. Input is matched case-insensitively.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!(
                "Invalid status '{}': expected pending, in_progress or completed",
                other
            )),
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum. Input is matched case-insensitively.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!(
                "Invalid priority '{}': expected low, medium or high",
                other
            )),
        }
    }
}

impl TryFrom<String> for TaskPriority {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents a task as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    /// Owner. Always the authenticated user, never taken from the request body.
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated task that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDateTime>,
}

/// A validated partial update. The nested options distinguish "leave unchanged"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<NaiveDateTime>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Applies the changes in place. The caller is responsible for `updated_at`.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// Query parameters for listing tasks. An empty value (`?status=`) means no filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
    }
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(max = 255, message = "title must be at most 255 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// `YYYY-MM-DD` or ISO 8601.
    pub due_date: Option<String>,
}

impl CreateTaskRequest {
    pub fn into_new_task(mut self) -> Result<NewTask, AppError> {
        self.title = self.title.map(|t| t.trim().to_string());
        self.description = self.description.map(|d| d.trim().to_string());
        if let Err(errors) = self.validate() {
            return Err(AppError::Validation(first_message(
                &errors,
                &["title", "description"],
            )));
        }

        let title = self.title.as_deref().unwrap_or_default();
        if title.is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }

        let due_date = match self.due_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_due_date(raw)?),
            _ => None,
        };

        Ok(NewTask {
            title: title.to_string(),
            description: non_empty(self.description),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            due_date,
        })
    }
}

/// Body of `PUT /api/tasks/{id}`. Absent and `null` fields are left unchanged,
/// except `due_date`, where an explicit `null` (or empty string) clears it.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(max = 255, message = "title must be at most 255 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
}

impl UpdateTaskRequest {
    pub fn into_changes(mut self) -> Result<TaskChanges, AppError> {
        self.title = self.title.map(|t| t.trim().to_string());
        self.description = self.description.map(|d| d.trim().to_string());
        if let Err(errors) = self.validate() {
            return Err(AppError::Validation(first_message(
                &errors,
                &["title", "description"],
            )));
        }

        let title = match self.title {
            Some(title) if title.is_empty() => {
                return Err(AppError::Validation("title cannot be empty".into()))
            }
            other => other,
        };

        let due_date = match self.due_date {
            None => None,
            Some(raw) => match raw.as_deref().map(str::trim) {
                Some(raw) if !raw.is_empty() => Some(Some(parse_due_date(raw)?)),
                _ => Some(None),
            },
        };

        let changes = TaskChanges {
            title,
            description: self.description.map(|d| non_empty(Some(d))),
            status: self.status,
            priority: self.priority,
            due_date,
        };

        if changes.is_empty() {
            return Err(AppError::Validation("No fields to update".into()));
        }
        Ok(changes)
    }
}

/// Deserializes a field that may be absent (`None`), `null` (`Some(None)`) or set.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a due date given as `YYYY-MM-DD` (midnight), a naive ISO 8601 date-time,
/// or an RFC 3339 timestamp with offset (converted to UTC).
pub fn parse_due_date(raw: &str) -> Result<NaiveDateTime, AppError> {
    let invalid =
        || AppError::Validation("Invalid due_date format. Use YYYY-MM-DD or ISO 8601.".into());

    if raw.len() == 10 {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(invalid);
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Utc).naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(invalid)
}
