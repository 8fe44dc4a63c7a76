use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// Extracts the authenticated user's ID from request extensions.
///
/// `AuthMiddleware` inserts this value after resolving the bearer token to a live
/// user. On a route the middleware does not wrap, extraction fails with a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUserId(pub i32);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUserId>().copied() {
            Some(user_id) => ready(Ok(user_id)),
            None => {
                log::error!("no authenticated user on guarded route {}", req.path());
                let err = AppError::Authorization("Authorization token is required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
