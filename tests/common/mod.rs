#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use taskflux::auth::{AuthResponse, CredentialHasher, TokenService};
use taskflux::routes;
use taskflux::AppState;

pub const TEST_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

// Helper struct to hold auth details
pub struct TestUser {
    pub id: i32,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

/// In-memory state with the cheapest bcrypt cost.
pub fn test_state(ttl_secs: u64) -> AppState {
    AppState::in_memory(
        CredentialHasher::new(taskflux::auth::password::MIN_COST),
        TokenService::new(TEST_SECRET, ttl_secs),
    )
}

pub async fn init_app(
    state: AppState,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_app),
    )
    .await
}

/// Sends a request and returns the status with the parsed JSON body.
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: test::TestRequest,
) -> (actix_web::http::StatusCode, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        panic!(
            "Response was not JSON. Status: {}. Body: {:?}",
            status,
            String::from_utf8_lossy(&bytes)
        )
    });
    (status, body)
}

pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> TestUser {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert!(
        status.is_success(),
        "Failed to register user. Status: {}. Body: {}",
        status,
        body
    );

    let auth_response: AuthResponse =
        serde_json::from_value(body).expect("Failed to parse registration response");
    TestUser {
        id: auth_response.user.id,
        token: auth_response.access_token,
    }
}
