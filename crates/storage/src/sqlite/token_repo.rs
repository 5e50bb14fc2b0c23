use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::SessionToken;
use sqlx::Row;

use crate::repository::{StorageError, TOKEN_KEY, TokenRepository};

use super::SqliteRepository;

#[async_trait]
impl TokenRepository for SqliteRepository {
    async fn load_token(&self) -> Result<Option<SessionToken>, StorageError> {
        let row = sqlx::query("SELECT value FROM client_state WHERE key = ?1")
            .bind(TOKEN_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        SessionToken::new(raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_token(&self, token: &SessionToken) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO client_state (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(TOKEN_KEY)
        .bind(token.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        tracing::debug!("session token persisted");
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM client_state WHERE key = ?1")
            .bind(TOKEN_KEY)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        tracing::debug!(removed = result.rows_affected(), "session token cleared");
        Ok(())
    }
}
