//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the single error type that leaves the auth gateway
//! and the task routes. Every failure is classified into one of six kinds, and each kind
//! maps to exactly one HTTP status and one `error_type` tag in the response envelope:
//!
//! ```json
//! { "success": false, "message": "...", "error_type": "validation_error" }
//! ```
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can return it
//! directly. `From` implementations for the component errors (credentials, tokens,
//! stores, validation) let the `?` operator do the classification.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::password::CredentialError;
use crate::auth::token::TokenError;
use crate::directory::DirectoryError;
use crate::tasks::TaskStoreError;

/// Message returned to clients for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400).
    Validation(String),
    /// Wrong credentials at login (HTTP 401). Always a generic message.
    Authentication(String),
    /// Missing, expired, malformed or stale token on a protected route (HTTP 401).
    Authorization(String),
    /// Duplicate email (HTTP 409).
    Conflict(String),
    /// Lookup by id found nothing (HTTP 404).
    NotFound(String),
    /// Storage failures and anything unexpected (HTTP 500).
    /// The message is logged server-side and never sent to the client.
    Internal(String),
}

impl AppError {
    /// The `error_type` tag used in the response envelope.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Authentication(_) => "authentication_error",
            AppError::Authorization(_) => "authorization_error",
            AppError::Conflict(_) => "conflict_error",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// The message a client is allowed to see.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg) => msg,
            AppError::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Authentication(msg) => write!(f, "Authentication Error: {}", msg),
            AppError::Authorization(msg) => write!(f, "Authorization Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into JSON envelope responses.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) | AppError::Authorization(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            log::error!("internal error: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.public_message(),
            "error_type": self.error_type(),
        }))
    }
}

/// Field-level validation failures surface as a single message.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::Validation(crate::validation::first_message(&errors, &[]))
    }
}

impl From<CredentialError> for AppError {
    fn from(error: CredentialError) -> AppError {
        match error {
            CredentialError::Empty | CredentialError::TooLong => {
                AppError::Validation(error.to_string())
            }
            CredentialError::Hashing(_) => AppError::Internal(error.to_string()),
        }
    }
}

/// Token failures on a protected route are authorization errors; signing failures
/// are internal.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Missing => AppError::Authorization("Authorization token is required".into()),
            TokenError::Malformed => AppError::Authorization("Invalid token".into()),
            TokenError::Expired => AppError::Authorization("Token has expired".into()),
            TokenError::Encoding(msg) => {
                AppError::Internal(format!("Failed to generate token: {}", msg))
            }
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(error: DirectoryError) -> AppError {
        match error {
            DirectoryError::DuplicateEmail => {
                AppError::Conflict("User with this email already exists".into())
            }
            DirectoryError::NotFound => AppError::NotFound("User not found".into()),
            DirectoryError::Storage(msg) => AppError::Internal(msg),
        }
    }
}

impl From<TaskStoreError> for AppError {
    fn from(error: TaskStoreError) -> AppError {
        match error {
            TaskStoreError::Storage(msg) => AppError::Internal(msg),
        }
    }
}
