use async_trait::async_trait;
use sheguard_core::model::DocPath;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::document::{Document, WriteMode, apply_write};
use crate::subscription::{DocumentSubscription, SubscriptionHub};

/// Errors surfaced by storage adapters.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable string key-value store for small local flags.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Read a flag. Missing keys are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get_flag(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write or overwrite a flag.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_flag(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a flag. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn remove_flag(&self, key: &str) -> Result<(), StorageError>;
}

/// Document database with point reads, writes and live subscriptions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document. Missing documents are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get_document(&self, path: &DocPath) -> Result<Option<Document>, StorageError>;

    /// Write a document, replacing or merging per `mode`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be committed.
    async fn set_document(
        &self,
        path: &DocPath,
        data: Document,
        mode: WriteMode,
    ) -> Result<(), StorageError>;

    /// Subscribe to a document. The current state is delivered first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the current state cannot be read.
    async fn subscribe(&self, path: &DocPath) -> Result<DocumentSubscription, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    flags: Arc<Mutex<HashMap<String, String>>>,
    documents: Arc<Mutex<HashMap<DocPath, Document>>>,
    hub: SubscriptionHub,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn hub(&self) -> &SubscriptionHub {
        &self.hub
    }
}

#[async_trait]
impl FlagStore for InMemoryRepository {
    async fn get_flag(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set_flag(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_flag(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryRepository {
    async fn get_document(&self, path: &DocPath) -> Result<Option<Document>, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(path).cloned())
    }

    async fn set_document(
        &self,
        path: &DocPath,
        data: Document,
        mode: WriteMode,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let next = apply_write(guard.remove(path), data, mode);
        self.hub.publish(path, Some(&next));
        guard.insert(path.clone(), next);
        Ok(())
    }

    async fn subscribe(&self, path: &DocPath) -> Result<DocumentSubscription, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(self.hub.register(path.clone(), guard.get(path).cloned()))
    }
}

/// Aggregates the flag and document stores behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub flags: Arc<dyn FlagStore>,
    pub documents: Arc<dyn DocumentStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let flags: Arc<dyn FlagStore> = Arc::new(repo.clone());
        let documents: Arc<dyn DocumentStore> = Arc::new(repo);
        Self { flags, documents }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contacts_path() -> DocPath {
        DocPath::parse("artifacts/app/users/u1/emergency_contacts/contacts").unwrap()
    }

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn flags_round_trip_and_remove() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_flag("hasOnboarded").await.unwrap(), None);
        repo.set_flag("hasOnboarded", "true").await.unwrap();
        assert_eq!(
            repo.get_flag("hasOnboarded").await.unwrap().as_deref(),
            Some("true")
        );
        repo.remove_flag("hasOnboarded").await.unwrap();
        repo.remove_flag("hasOnboarded").await.unwrap();
        assert_eq!(repo.get_flag("hasOnboarded").await.unwrap(), None);
    }

    #[tokio::test]
    async fn merge_write_preserves_other_fields() {
        let repo = InMemoryRepository::new();
        let path = contacts_path();
        repo.set_document(&path, doc(json!({"owner": "u1", "list": []})), WriteMode::Replace)
            .await
            .unwrap();
        repo.set_document(&path, doc(json!({"list": [{"id": "1"}]})), WriteMode::Merge)
            .await
            .unwrap();
        let stored = repo.get_document(&path).await.unwrap().unwrap();
        assert_eq!(
            serde_json::Value::Object(stored),
            json!({"owner": "u1", "list": [{"id": "1"}]})
        );
    }

    #[tokio::test]
    async fn subscription_sees_current_state_then_each_write() {
        let repo = InMemoryRepository::new();
        let path = contacts_path();
        let mut sub = repo.subscribe(&path).await.unwrap();

        repo.set_document(&path, doc(json!({"list": ["a"]})), WriteMode::Merge)
            .await
            .unwrap();

        let initial = sub.next().await.unwrap().unwrap();
        assert!(!initial.exists());
        let after = sub.next().await.unwrap().unwrap();
        assert_eq!(after.field("list"), Some(&json!(["a"])));

        drop(sub);
        assert_eq!(repo.hub().subscriber_count(), 0);
    }
}
