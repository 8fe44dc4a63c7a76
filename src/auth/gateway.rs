//! The request-level auth contract: registration, login, the protected-route
//! guard, and the profile operations that sit behind it.
//!
//! Every method returns an [`AppError`] kind on failure, never a component error.

use std::sync::Arc;

use validator::Validate;

use super::password::CredentialHasher;
use super::token::{bearer_token, TokenService};
use super::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::directory::{DirectoryError, UserDirectory};
use crate::error::AppError;
use crate::models::{NewUser, UserChanges, UserView};
use crate::validation::{first_message, normalize_email};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const DUPLICATE_EMAIL: &str = "User with this email already exists";

/// A freshly authenticated user and the token minted for them.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserView,
    pub access_token: String,
}

pub struct AuthGateway {
    directory: Arc<dyn UserDirectory>,
    hasher: CredentialHasher,
    tokens: TokenService,
}

impl AuthGateway {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: CredentialHasher,
        tokens: TokenService,
    ) -> Self {
        Self {
            directory,
            hasher,
            tokens,
        }
    }

    /// Registers a user and logs them in.
    ///
    /// Checks run name → email → password → uniqueness; the first failure is returned.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSession, AppError> {
        let request = request.normalized();
        request.validate().map_err(|errors| {
            AppError::Validation(first_message(&errors, &RegisterRequest::FIELD_ORDER))
        })?;

        if self.directory.find_by_email(&request.email).await?.is_some() {
            log::warn!("registration rejected: email already registered");
            return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
        }

        let credential_hash = self.hasher.hash(&request.password)?;
        let user = self
            .directory
            .create(NewUser {
                name: request.name,
                email: request.email,
                credential_hash,
            })
            .await?;

        let access_token = self.tokens.issue(user.id)?;
        log::info!("user {} registered", user.id);

        Ok(AuthSession {
            user: user.into(),
            access_token,
        })
    }

    /// Verifies credentials and issues a token.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, AppError> {
        let email = normalize_email(&request.email);
        if email.is_empty() || request.password.is_empty() {
            return Err(AppError::Validation("Email and password are required".into()));
        }

        let user = match self.directory.find_by_email(&email).await? {
            Some(user) if self.hasher.verify(&user.credential_hash, &request.password) => user,
            _ => {
                log::warn!("failed login attempt for {}", email);
                return Err(AppError::Authentication(INVALID_CREDENTIALS.into()));
            }
        };

        let access_token = self.tokens.issue(user.id)?;
        log::info!("user {} logged in", user.id);

        Ok(AuthSession {
            user: user.into(),
            access_token,
        })
    }

    /// Resolves an `Authorization` header value to the id of a live user.
    ///
    /// A token with a valid signature still fails when its subject is missing or
    /// inactive.
    pub async fn authorize(&self, header: Option<&str>) -> Result<i32, AppError> {
        let user_id = bearer_token(header)
            .and_then(|token| self.tokens.verify(token))
            .map_err(|e| {
                log::debug!("bearer token rejected: {}", e);
                AppError::from(e)
            })?;

        match self.directory.find_by_id(user_id).await? {
            Some(user) => Ok(user.id),
            None => {
                log::warn!("token presented for missing or inactive user {}", user_id);
                Err(AppError::Authorization("User not found or inactive".into()))
            }
        }
    }

    pub async fn get_profile(&self, user_id: i32) -> Result<UserView, AppError> {
        self.directory
            .find_by_id(user_id)
            .await?
            .map(UserView::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Applies a partial profile update. Provided fields follow the registration
    /// rules; at least one field must be provided.
    pub async fn update_profile(
        &self,
        user_id: i32,
        request: UpdateProfileRequest,
    ) -> Result<UserView, AppError> {
        let request = request.normalized();
        request.validate().map_err(|errors| {
            AppError::Validation(first_message(&errors, &UpdateProfileRequest::FIELD_ORDER))
        })?;

        let changes = UserChanges {
            name: request.name,
            email: request.email,
        };
        if changes.is_empty() {
            return Err(AppError::Validation("No valid updates provided".into()));
        }

        match self.directory.update(user_id, changes).await {
            Ok(user) => {
                log::info!("user {} updated their profile", user.id);
                Ok(user.into())
            }
            Err(DirectoryError::DuplicateEmail) => {
                Err(AppError::Conflict("Email is already taken".into()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
