use std::sync::Arc;

use crate::auth::{AuthGateway, CredentialHasher, TokenService};
use crate::directory::{InMemoryUserDirectory, UserDirectory};
use crate::tasks::{InMemoryTaskStore, TaskStore};

/// Shared application state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthGateway>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        tasks: Arc<dyn TaskStore>,
        hasher: CredentialHasher,
        tokens: TokenService,
    ) -> Self {
        Self {
            auth: Arc::new(AuthGateway::new(directory, hasher, tokens)),
            tasks,
        }
    }

    /// State backed by the in-memory directory and task store. Nothing survives a
    /// restart.
    pub fn in_memory(hasher: CredentialHasher, tokens: TokenService) -> Self {
        Self::new(
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(InMemoryTaskStore::new()),
            hasher,
            tokens,
        )
    }
}
