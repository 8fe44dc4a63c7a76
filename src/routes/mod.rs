pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Routes under `/api`. The caller mounts them inside the guarded scope.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::get_profile)
                .service(auth::update_profile)
                .service(auth::verify_token),
        )
        .service(
            web::scope("/tasks")
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// The whole HTTP surface: extractor error handlers, the public welcome document,
/// the guarded `/api` scope and the 404 fallback. `web::Data<AppState>` must be registered by the caller.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(health::welcome)
        .service(web::scope("/api").wrap(AuthMiddleware).configure(config))
        .default_service(web::to(not_found));
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        let message = match &err {
            JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
            JsonPayloadError::Deserialize(e) if e.is_data() => {
                format!("Invalid request body: {}", e)
            }
            _ => "Request body must be valid JSON".to_string(),
        };
        AppError::Validation(message).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        AppError::Validation(format!("Invalid query parameters: {}", err)).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        AppError::Validation(format!("Invalid path parameter: {}", err)).into()
    })
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Endpoint not found".into()))
}
