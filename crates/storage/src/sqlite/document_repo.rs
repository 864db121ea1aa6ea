use async_trait::async_trait;
use chrono::Utc;
use sheguard_core::model::DocPath;
use sqlx::{Row, SqliteConnection};

use crate::document::{Document, WriteMode, apply_write};
use crate::repository::{DocumentStore, StorageError};
use crate::subscription::DocumentSubscription;

use super::SqliteRepository;
use super::mapping::{conn, document_from_text, document_to_text};

async fn read_document(
    executor: &mut SqliteConnection,
    path: &DocPath,
) -> Result<Option<Document>, StorageError> {
    let row = sqlx::query("SELECT data FROM documents WHERE path = ?1")
        .bind(path.as_str())
        .fetch_optional(&mut *executor)
        .await
        .map_err(conn)?;

    let Some(row) = row else {
        return Ok(None);
    };
    let raw: String = row
        .try_get("data")
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    document_from_text(&raw).map(Some)
}

#[async_trait]
impl DocumentStore for SqliteRepository {
    async fn get_document(&self, path: &DocPath) -> Result<Option<Document>, StorageError> {
        let mut connection = self.pool.acquire().await.map_err(conn)?;
        read_document(&mut connection, path).await
    }

    async fn set_document(
        &self,
        path: &DocPath,
        data: Document,
        mode: WriteMode,
    ) -> Result<(), StorageError> {
        let _gate = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let current = match mode {
            WriteMode::Merge => read_document(&mut tx, path).await?,
            WriteMode::Replace => None,
        };
        let next = apply_write(current, data, mode);

        sqlx::query(
            r"
            INSERT INTO documents (path, data, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(path) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            ",
        )
        .bind(path.as_str())
        .bind(document_to_text(&next)?)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        self.hub.publish(path, Some(&next));
        Ok(())
    }

    async fn subscribe(&self, path: &DocPath) -> Result<DocumentSubscription, StorageError> {
        let _gate = self.write_gate.lock().await;
        let current = self.get_document(path).await?;
        Ok(self.hub.register(path.clone(), current))
    }
}
