use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use super::extractors::AuthenticatedUserId;
use crate::error::AppError;
use crate::state::AppState;

/// Paths that are reachable without a bearer token.
const PUBLIC_PATHS: [&str; 3] = ["/api/health", "/api/auth/register", "/api/auth/login"];

fn is_public(path: &str) -> bool {
    let path = path.trim_end_matches('/');
    PUBLIC_PATHS.contains(&path)
}

/// Resolves the request's bearer token to a live user id.
async fn authorize(req: &ServiceRequest) -> Result<i32, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("application state is not registered".into()))?;

    // A header that is not valid UTF-8 is treated as a malformed token.
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default().to_string());

    state.auth.authorize(auth_header.as_deref()).await
}

/// Guards every route it wraps except the public ones: resolves the bearer token to a
/// live user and stores an [`AuthenticatedUserId`] in the request extensions.
///
/// Rejected requests are answered here with the error envelope; the wrapped
/// service never sees them.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            match authorize(&req).await {
                Ok(user_id) => {
                    req.extensions_mut().insert(AuthenticatedUserId(user_id));
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(e) => Ok(req.error_response(e).map_into_right_body()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::MIN_COST;
    use crate::auth::{CredentialHasher, TokenService};
    use actix_web::{http::StatusCode, test, App, HttpResponse};
    use serde_json::Value;

    async fn whoami(user_id: AuthenticatedUserId) -> HttpResponse {
        HttpResponse::Ok().body(user_id.0.to_string())
    }

    async fn open() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[::core::prelude::v1::test]
    fn test_public_paths() {
        assert!(is_public("/api/health"));
        assert!(is_public("/api/auth/login"));
        assert!(is_public("/api/auth/register/"));
        assert!(!is_public("/api/auth/profile"));
        assert!(!is_public("/api/auth/login-as-admin"));
        assert!(!is_public("/api/tasks"));
    }

    #[actix_rt::test]
    async fn test_rejections_are_responses_not_errors() {
        let tokens = TokenService::new(b"middleware-test-secret-long-enough!!", 3600);
        let state = AppState::in_memory(CredentialHasher::new(MIN_COST), tokens.clone());
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .route("/health", web::get().to(open))
                    .route("/whoami", web::get().to(whoami)),
            ),
        )
        .await;

        // No token: the guard answers with a 401 envelope.
        let req = test::TestRequest::get().uri("/api/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Authorization token is required");
        assert_eq!(body["error_type"], "authorization_error");

        // A well-signed token for a user that does not exist.
        let token = tokens.issue(77).unwrap();
        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User not found or inactive");

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
