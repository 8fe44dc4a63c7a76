use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{DirectoryError, UserDirectory};
use crate::models::{NewUser, User, UserChanges};
use crate::validation::normalize_email;

#[derive(Default)]
struct Records {
    last_id: i32,
    users: Vec<User>,
}

/// A `UserDirectory` kept in process memory. Ids start at 1.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    records: Mutex<Records>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, DirectoryError> {
        self.records
            .lock()
            .map_err(|_| DirectoryError::Storage("user directory lock poisoned".into()))
    }
}

impl Records {
    fn active_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.is_active && user.email == email)
    }

    fn active_by_id_mut(&mut self, id: i32) -> Option<&mut User> {
        self.users
            .iter_mut()
            .find(|user| user.is_active && user.id == id)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        let email = normalize_email(email);
        Ok(self.lock()?.active_by_email(&email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DirectoryError> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|user| user.is_active && user.id == id)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DirectoryError> {
        let email = normalize_email(&user.email);
        let mut records = self.lock()?;
        if records.active_by_email(&email).is_some() {
            return Err(DirectoryError::DuplicateEmail);
        }

        records.last_id += 1;
        let now = Utc::now();
        let created = User {
            id: records.last_id,
            name: user.name.trim().to_string(),
            email,
            credential_hash: user.credential_hash,
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
        };
        records.users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DirectoryError> {
        let mut records = self.lock()?;
        let email = changes.email.as_deref().map(normalize_email);

        if let Some(email) = &email {
            if let Some(other) = records.active_by_email(email) {
                if other.id != id {
                    return Err(DirectoryError::DuplicateEmail);
                }
            }
        }

        let user = records
            .active_by_id_mut(id)
            .ok_or(DirectoryError::NotFound)?;
        if let Some(name) = changes.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = email {
            user.email = email;
        }
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }

    async fn deactivate(&self, id: i32) -> Result<(), DirectoryError> {
        let mut records = self.lock()?;
        let user = records
            .active_by_id_mut(id)
            .ok_or(DirectoryError::NotFound)?;
        user.is_active = false;
        user.updated_at = Some(Utc::now());
        Ok(())
    }
}
