use async_trait::async_trait;
use sqlx::PgPool;

use super::{DirectoryError, UserDirectory};
use crate::models::{NewUser, User, UserChanges};
use crate::validation::normalize_email;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, is_active, created_at, updated_at";

/// `UserDirectory` backed by the `users` table.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1 AND is_active = TRUE",
            USER_COLUMNS
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DirectoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND is_active = TRUE",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, DirectoryError> {
        let email = normalize_email(&user.email);

        // Advisory only: a concurrent insert can still race past this check, in which
        // case the unique index rejects the INSERT and the error maps to DuplicateEmail.
        if self.find_by_email(&email).await?.is_some() {
            return Err(DirectoryError::DuplicateEmail);
        }

        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.name.trim())
        .bind(&email)
        .bind(&user.credential_hash)
        .fetch_one(&self.pool)
        .await?;

        log::info!("user {} created", created.id);
        Ok(created)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DirectoryError> {
        let email = changes.email.as_deref().map(normalize_email);

        if let Some(email) = &email {
            if let Some(other) = self.find_by_email(email).await? {
                if other.id != id {
                    return Err(DirectoryError::DuplicateEmail);
                }
            }
        }

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET name = COALESCE($2, name), email = COALESCE($3, email), updated_at = NOW() \
             WHERE id = $1 AND is_active = TRUE \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(DirectoryError::NotFound)
    }

    async fn deactivate(&self, id: i32) -> Result<(), DirectoryError> {
        let result = sqlx::query(
            "UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::NotFound);
        }
        log::info!("user {} deactivated", id);
        Ok(())
    }
}
