pub mod extractors;
pub mod gateway;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserView;
use crate::validation::{normalize_email, validate_display_name, validate_password, EMAIL_REGEX};

// Re-export necessary items
pub use extractors::AuthenticatedUserId;
pub use gateway::{AuthGateway, AuthSession};
pub use middleware::AuthMiddleware;
pub use password::{CredentialError, CredentialHasher};
pub use token::{bearer_token, Claims, TokenError, TokenService};

/// Represents the payload for a new user registration request.
///
/// Missing fields deserialize as empty strings and then fail validation with the
/// same messages as too-short values.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, 2-100 characters after trimming.
    #[serde(default)]
    #[validate(custom = "validate_display_name")]
    pub name: String,
    /// Email address. Trimmed and lower-cased before validation.
    #[serde(default)]
    #[validate(regex(path = "EMAIL_REGEX", message = "Invalid email format"))]
    pub email: String,
    /// Password, 6-128 characters. Never trimmed.
    #[serde(default)]
    #[validate(custom = "validate_password")]
    pub password: String,
}

impl RegisterRequest {
    /// Field order in which validation failures are reported.
    pub const FIELD_ORDER: [&'static str; 3] = ["name", "email", "password"];

    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password: self.password,
        }
    }
}

/// Represents the payload for a user login request.
///
/// Only presence is checked: login must not reveal which rule an unknown account
/// would have failed.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Represents the payload for a profile update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(custom = "validate_display_name")]
    pub name: Option<String>,
    #[validate(regex(path = "EMAIL_REGEX", message = "Invalid email format"))]
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub const FIELD_ORDER: [&'static str; 2] = ["name", "email"];

    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|name| name.trim().to_string()),
            email: self.email.map(|email| normalize_email(&email)),
        }
    }
}

/// Response body after successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserView,
    /// The signed bearer token for subsequent requests.
    pub access_token: String,
}

impl AuthResponse {
    pub fn new(message: &str, session: AuthSession) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            user: session.user,
            access_token: session.access_token,
        }
    }
}
