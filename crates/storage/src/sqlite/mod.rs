use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{Storage, TokenRepository};

mod migrate;
mod token_repo;

/// The token store holds one row; a desktop client never needs more.
const MAX_CONNECTIONS: u32 = 2;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Session token persistence in a local `SQLite` file.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Open the token database at `database_url`, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` for a malformed URL or an unreachable database.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;
        tracing::debug!(url = database_url, "token store opened");
        Ok(Self { pool })
    }

    /// Bring the `client_state` schema up to date.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if a schema step fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Token storage on `SQLite`, migrated and ready for use.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be opened or migrated.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let tokens: Arc<dyn TokenRepository> = Arc::new(repo);
        Ok(Self { tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_store_can_cross_tasks() {
        fn shareable<T: Send + Sync + 'static>() {}
        shareable::<SqliteRepository>();
        shareable::<Storage>();
    }

    #[tokio::test]
    async fn malformed_url_is_rejected() {
        let err = SqliteRepository::connect("postgres://nope").await.err();
        assert!(matches!(err, Some(SqliteInitError::Sqlx(_))));
    }
}
