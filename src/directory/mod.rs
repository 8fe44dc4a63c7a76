//! The user directory: lookup and persistence of user records.
//!
//! The auth gateway only sees the `UserDirectory` trait. Production wires in
//! [`PgUserDirectory`]; tests and local experiments can use
//! [`InMemoryUserDirectory`]. Both apply the same rules:
//!
//! - emails are normalized (trimmed, lower-cased) before every lookup and write,
//! - inactive users are invisible to every lookup,
//! - no two active users share a normalized email.
//!
//! The uniqueness pre-check in `create`/`update` is advisory. For PostgreSQL the
//! partial unique index on `users(email) WHERE is_active` is the final authority and
//! a violation on write is reported as [`DirectoryError::DuplicateEmail`] as well.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, User, UserChanges};

pub use memory::InMemoryUserDirectory;
pub use postgres::PgUserDirectory;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("an active user with this email already exists")]
    DuplicateEmail,

    #[error("user not found")]
    NotFound,

    #[error("user directory storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for DirectoryError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => DirectoryError::DuplicateEmail,
            _ => DirectoryError::Storage(error.to_string()),
        }
    }
}

#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Finds the active user with this email (normalized before lookup).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError>;

    /// Finds the active user with this id.
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DirectoryError>;

    /// Stores a new active user.
    ///
    /// # Errors
    /// * `DuplicateEmail` - an active user already has this normalized email
    async fn create(&self, user: NewUser) -> Result<User, DirectoryError>;

    /// Applies a partial update to an active user and bumps `updated_at`.
    ///
    /// # Errors
    /// * `NotFound` - no active user with this id
    /// * `DuplicateEmail` - another active user already has the new email
    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DirectoryError>;

    /// Marks a user inactive. The record is kept.
    ///
    /// # Errors
    /// * `NotFound` - no active user with this id
    async fn deactivate(&self, id: i32) -> Result<(), DirectoryError>;
}
