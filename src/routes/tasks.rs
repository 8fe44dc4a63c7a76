use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::task::{CreateTaskRequest, TaskFilter, UpdateTaskRequest},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Retrieves the authenticated user's tasks, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): `pending`, `in_progress` or `completed`.
/// - `priority` (optional): `low`, `medium` or `high`.
///
/// Unknown values are rejected with `400`.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    query_params: web::Query<TaskFilter>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list(user_id.0, &query_params).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "tasks": tasks })))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title` (required): 1-255 characters after trimming.
/// - `description` (optional): up to 2000 characters.
/// - `status` (optional): defaults to `pending`.
/// - `priority` (optional): defaults to `medium`.
/// - `due_date` (optional): `YYYY-MM-DD` or ISO 8601.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    task_data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let new_task = task_data.into_inner().into_new_task()?;
    let task = state.tasks.create(user_id.0, new_task).await?;
    log::info!("user {} created task {}", user_id.0, task.id);
    Ok(HttpResponse::Created().json(json!({ "success": true, "task": task })))
}

/// Retrieves one task. Tasks owned by other users are reported as not found.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .get(user_id.0, task_id.into_inner())
        .await?
        .ok_or_else(task_not_found)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "task": task })))
}

/// Applies a partial update to a task the user owns.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<i32>,
    task_data: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let changes = task_data.into_inner().into_changes()?;
    let task = state
        .tasks
        .update(user_id.0, task_id.into_inner(), changes)
        .await?
        .ok_or_else(task_not_found)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "task": task })))
}

#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    if !state.tasks.delete(user_id.0, task_id).await? {
        return Err(task_not_found());
    }
    log::info!("user {} deleted task {}", user_id.0, task_id);
    Ok(HttpResponse::Ok().json(json!({ "success": true, "deleted": task_id })))
}

#[cfg(test)]
mod tests {
    use crate::models::task::{CreateTaskRequest, UpdateTaskRequest};

    #[test]
    fn test_task_input_validation() {
        let empty_title = CreateTaskRequest {
            title: Some("   ".to_string()),
            description: None,
            status: None,
            priority: None,
            due_date: None,
        };
        assert!(
            empty_title.into_new_task().is_err(),
            "Validation should fail for blank title."
        );

        let long_title = CreateTaskRequest {
            title: Some("a".repeat(256)),
            description: None,
            status: None,
            priority: None,
            due_date: None,
        };
        assert!(
            long_title.into_new_task().is_err(),
            "Validation should fail for overly long title."
        );

        let long_description = CreateTaskRequest {
            title: Some("Valid title".to_string()),
            description: Some("b".repeat(2001)),
            status: None,
            priority: None,
            due_date: None,
        };
        assert!(long_description.into_new_task().is_err());

        let empty_update = UpdateTaskRequest::default();
        assert!(
            empty_update.into_changes().is_err(),
            "An update with no fields should be rejected."
        );
    }
}
