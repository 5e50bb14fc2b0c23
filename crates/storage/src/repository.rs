use async_trait::async_trait;
use quiz_core::model::SessionToken;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key under which the bearer token is persisted between launches.
pub const TOKEN_KEY: &str = "auth_token";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable home of the session token.
///
/// At most one token is stored; saving replaces the previous one.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Read the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or holds an unusable value.
    async fn load_token(&self) -> Result<Option<SessionToken>, StorageError>;

    /// Persist the token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the token cannot be written.
    async fn save_token(&self, token: &SessionToken) -> Result<(), StorageError>;

    /// Remove the persisted token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_token(&self) -> Result<(), StorageError>;
}

/// Simple in-memory key/value store for tests and the offline demo.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a token, as if a previous launch had saved it.
    #[must_use]
    pub fn with_token(token: &SessionToken) -> Self {
        let repo = Self::new();
        if let Ok(mut guard) = repo.entries.lock() {
            guard.insert(TOKEN_KEY.to_owned(), token.as_str().to_owned());
        }
        repo
    }
}

#[async_trait]
impl TokenRepository for InMemoryRepository {
    async fn load_token(&self) -> Result<Option<SessionToken>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(TOKEN_KEY)
            .map(|raw| {
                SessionToken::new(raw.clone())
                    .map_err(|e| StorageError::Serialization(e.to_string()))
            })
            .transpose()
    }

    async fn save_token(&self, token: &SessionToken) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(TOKEN_KEY.to_owned(), token.as_str().to_owned());
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(TOKEN_KEY);
        Ok(())
    }
}

/// Repositories behind trait objects so the backend can be swapped.
#[derive(Clone)]
pub struct Storage {
    pub tokens: Arc<dyn TokenRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let tokens: Arc<dyn TokenRepository> = Arc::new(InMemoryRepository::new());
        Self { tokens }
    }
}
