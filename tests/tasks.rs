mod common;

use std::net::TcpListener;

use actix_web::http::StatusCode;
use actix_web::{rt, test, web, App, HttpServer};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskflux::models::{Task, TaskPriority, TaskStatus};
use taskflux::routes;

use common::{init_app, register_user, send, test_state};

fn titles(body: &Value) -> Vec<String> {
    body["tasks"]
        .as_array()
        .expect("tasks should be an array")
        .iter()
        .map(|task| task["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[actix_rt::test]
async fn test_create_task_unauthorized() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let state = web::Data::new(test_state(3600));
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::configure_app)
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let server_handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/tasks", port))
        .json(&json!({ "title": "Unauthorized Task" }))
        .send()
        .await
        .expect("Failed to send request");

    let status = resp.status();
    let body: Value = resp.json().await.expect("Body should be JSON");
    assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED, "Body: {}", body);
    assert_eq!(body["message"], "Authorization token is required");

    let resp = client
        .get(format!("http://127.0.0.1:{}/api/health", port))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    server_handle.stop(true).await;
}

#[test_log::test(actix_rt::test)]
async fn test_task_crud_flow() {
    let app = init_app(test_state(3600)).await;
    let user = register_user(&app, "Crud User", "crud@example.com", "secret1").await;

    // Create
    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/tasks")
            .append_header(user.bearer())
            .set_json(json!({
                "title": "  Write report ",
                "description": "Quarterly numbers",
                "priority": "high",
                "due_date": "2024-12-31"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Create failed. Body: {}", body);
    let task: Task = serde_json::from_value(body["task"].clone()).unwrap();
    assert_eq!(task.title, "Write report");
    assert_eq!(task.description.as_deref(), Some("Quarterly numbers"));
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.priority, TaskPriority::High);
    assert_eq!(task.user_id, user.id);
    assert_eq!(body["task"]["due_date"], "2024-12-31T00:00:00");

    // Read
    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/tasks/{}", task.id))
            .append_header(user.bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["id"], task.id);

    // Update
    let (status, body) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/tasks/{}", task.id))
            .append_header(user.bearer())
            .set_json(json!({ "status": "in_progress", "due_date": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Update failed. Body: {}", body);
    assert_eq!(body["task"]["status"], "in_progress");
    assert_eq!(body["task"]["title"], "Write report");
    assert_eq!(body["task"]["due_date"], Value::Null);

    let (status, body) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/tasks/{}", task.id))
            .append_header(user.bearer())
            .set_json(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No fields to update");

    // Delete
    let (status, body) = send(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/tasks/{}", task.id))
            .append_header(user.bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "deleted": task.id }));

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/tasks/{}", task.id))
            .append_header(user.bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");
}

#[actix_rt::test]
async fn test_list_tasks_filters_and_ordering() {
    let app = init_app(test_state(3600)).await;
    let user = register_user(&app, "Lister", "lister@example.com", "secret1").await;

    for (title, status, priority) in [
        ("first", "pending", "low"),
        ("second", "completed", "high"),
        ("third", "pending", "high"),
    ] {
        let (code, body) = send(
            &app,
            test::TestRequest::post()
                .uri("/api/tasks")
                .append_header(user.bearer())
                .set_json(json!({ "title": title, "status": status, "priority": priority })),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED, "Body: {}", body);
    }

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/tasks")
            .append_header(user.bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["third", "second", "first"]);

    let (_, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/tasks?status=pending")
            .append_header(user.bearer()),
    )
    .await;
    assert_eq!(titles(&body), vec!["third", "first"]);

    let (_, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/tasks?status=pending&priority=HIGH")
            .append_header(user.bearer()),
    )
    .await;
    assert_eq!(titles(&body), vec!["third"]);

    // Empty values come from forms with an unselected dropdown.
    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/tasks?status=&priority=")
            .append_header(user.bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Body: {}", body);
    assert_eq!(titles(&body), vec!["third", "second", "first"]);

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/tasks?status=archived")
            .append_header(user.bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
}

#[actix_rt::test]
async fn test_tasks_are_invisible_to_other_users() {
    let app = init_app(test_state(3600)).await;
    let owner = register_user(&app, "Owner", "owner@example.com", "secret1").await;
    let other = register_user(&app, "Other", "other@example.com", "secret1").await;

    let (_, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/tasks")
            .append_header(owner.bearer())
            .set_json(json!({ "title": "Private" })),
    )
    .await;
    let task_id = body["task"]["id"].as_i64().unwrap();
    let uri = format!("/api/tasks/{}", task_id);

    let (status, _) = send(
        &app,
        test::TestRequest::get().uri(&uri).append_header(other.bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .append_header(other.bearer())
            .set_json(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        test::TestRequest::delete().uri(&uri).append_header(other.bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/tasks")
            .append_header(other.bearer()),
    )
    .await;
    assert_eq!(body["tasks"], json!([]));

    let (_, body) = send(
        &app,
        test::TestRequest::get().uri(&uri).append_header(owner.bearer()),
    )
    .await;
    assert_eq!(body["task"]["title"], "Private");
}

#[actix_rt::test]
async fn test_invalid_task_inputs() {
    let app = init_app(test_state(3600)).await;
    let user = register_user(&app, "Validator", "validator@example.com", "secret1").await;

    let cases = vec![
        (json!({}), "title is required"),
        (json!({ "title": "   " }), "title is required"),
        (
            json!({ "title": "a".repeat(256) }),
            "title must be at most 255 characters",
        ),
        (
            json!({ "title": "ok", "due_date": "31/12/2024" }),
            "Invalid due_date format. Use YYYY-MM-DD or ISO 8601.",
        ),
    ];
    for (payload, expected) in cases {
        let (status, body) = send(
            &app,
            test::TestRequest::post()
                .uri("/api/tasks")
                .append_header(user.bearer())
                .set_json(&payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "Payload: {}", payload);
        assert_eq!(body["message"], expected, "Payload: {}", payload);
    }

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/tasks")
            .append_header(user.bearer())
            .set_json(json!({ "title": "ok", "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/tasks/not-a-number")
            .append_header(user.bearer()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
}
