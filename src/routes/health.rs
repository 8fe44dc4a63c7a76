use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Health check endpoint
///
/// Public. Reports the API version and the current server time.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "TaskFlux API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
        "timestamp": Utc::now()
    }))
}

/// Public landing document at `/`: names the service and lists its main endpoints.
#[get("/")]
pub async fn welcome() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to TaskFlux API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "register": "/api/auth/register",
            "login": "/api/auth/login",
            "profile": "/api/auth/profile",
            "verify_token": "/api/auth/verify-token",
            "tasks": "/api/tasks",
            "health": "/api/health"
        }
    }))
}
