//! Per-user log of sent SOS alerts.

use std::sync::Arc;

use serde_json::Value;
use sheguard_core::Clock;
use sheguard_core::model::{DocPath, SosHistory, SosHistoryEntry, SosHistoryId, UserId};
use storage::document::{Document, WriteMode};
use storage::repository::DocumentStore;

use crate::error::SosHistoryServiceError;
use crate::live::LiveDocument;
use crate::sos::SosAlert;

#[derive(Clone)]
pub struct SosHistoryService {
    clock: Clock,
    documents: Arc<dyn DocumentStore>,
    app_id: String,
}

impl SosHistoryService {
    #[must_use]
    pub fn new(clock: Clock, documents: Arc<dyn DocumentStore>, app_id: impl Into<String>) -> Self {
        Self {
            clock,
            documents,
            app_id: app_id.into(),
        }
    }

    fn path(&self, uid: &UserId) -> Result<DocPath, SosHistoryServiceError> {
        Ok(DocPath::sos_history(&self.app_id, uid)?)
    }

    /// # Errors
    ///
    /// Returns `SosHistoryServiceError` on storage failures or a malformed document.
    pub async fn list(&self, uid: &UserId) -> Result<SosHistory, SosHistoryServiceError> {
        let doc = self.documents.get_document(&self.path(uid)?).await?;
        decode_history(doc)
    }

    /// Append an entry for an alert that just went out.
    ///
    /// # Errors
    ///
    /// Returns `SosHistoryServiceError` if the history cannot be read or written.
    pub async fn record(
        &self,
        uid: &UserId,
        alert: &SosAlert,
    ) -> Result<SosHistoryEntry, SosHistoryServiceError> {
        let mut history = self.list(uid).await?;
        let entry = SosHistoryEntry {
            id: SosHistoryId::generate(),
            timestamp: self.clock.now(),
            message: alert.body.clone(),
            recipients: alert.recipients.len(),
        };
        history.record(entry.clone());
        self.write(uid, &history).await?;
        tracing::info!(uid = %uid, entries = history.len(), "sos history recorded");
        Ok(entry)
    }

    /// # Errors
    ///
    /// Returns `SosHistoryServiceError::History` if the id is unknown.
    pub async fn remove(
        &self,
        uid: &UserId,
        id: &SosHistoryId,
    ) -> Result<SosHistoryEntry, SosHistoryServiceError> {
        let mut history = self.list(uid).await?;
        let removed = history.remove(id)?;
        self.write(uid, &history).await?;
        Ok(removed)
    }

    /// Live view of the user's history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SosHistoryServiceError` if the subscription cannot be opened.
    pub async fn subscribe(
        &self,
        uid: &UserId,
    ) -> Result<LiveDocument<SosHistory, SosHistoryServiceError>, SosHistoryServiceError> {
        let subscription = self.documents.subscribe(&self.path(uid)?).await?;
        Ok(LiveDocument::new(subscription, decode_history))
    }

    async fn write(&self, uid: &UserId, history: &SosHistory) -> Result<(), SosHistoryServiceError> {
        let Value::Object(doc) = serde_json::to_value(history)
            .map_err(|err| SosHistoryServiceError::Malformed(err.to_string()))?
        else {
            return Err(SosHistoryServiceError::Malformed("sos history is not an object".into()));
        };
        self.documents
            .set_document(&self.path(uid)?, doc, WriteMode::Replace)
            .await?;
        Ok(())
    }
}

/// Decode a history document (or its absence), newest entry first.
///
/// # Errors
///
/// Returns `SosHistoryServiceError::Malformed` if `entries` has the wrong shape.
pub fn decode_history(doc: Option<Document>) -> Result<SosHistory, SosHistoryServiceError> {
    match doc {
        None => Ok(SosHistory::new()),
        Some(doc) => serde_json::from_value::<SosHistory>(Value::Object(doc))
            .map(|history| SosHistory::from_persisted(history.into_entries()))
            .map_err(|err| SosHistoryServiceError::Malformed(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sheguard_core::model::SosHistoryError;
    use sheguard_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn alert(recipients: usize) -> SosAlert {
        SosAlert {
            body: "help".into(),
            recipients: vec!["100".to_string(); recipients],
        }
    }

    #[tokio::test]
    async fn record_list_remove() {
        let repo = InMemoryRepository::new();
        let mut clock = fixed_clock();
        let uid = UserId::new("u1");

        let first = SosHistoryService::new(clock, Arc::new(repo.clone()), "app")
            .record(&uid, &alert(2))
            .await
            .unwrap();
        clock.advance(chrono::Duration::minutes(5));
        let svc = SosHistoryService::new(clock, Arc::new(repo.clone()), "app");
        let second = svc.record(&uid, &alert(1)).await.unwrap();

        let history = svc.list(&uid).await.unwrap();
        let ids: Vec<_> = history.entries().iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);
        assert_eq!(history.entries()[1].recipients, 2);

        svc.remove(&uid, &first.id).await.unwrap();
        assert_eq!(svc.list(&uid).await.unwrap().len(), 1);
        let err = svc.remove(&uid, &first.id).await.unwrap_err();
        assert!(matches!(
            err,
            SosHistoryServiceError::History(SosHistoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn subscription_sees_new_entries() {
        let repo = InMemoryRepository::new();
        let svc = SosHistoryService::new(fixed_clock(), Arc::new(repo.clone()), "app");
        let uid = UserId::new("u1");

        let mut live = svc.subscribe(&uid).await.unwrap();
        assert!(live.next().await.unwrap().unwrap().is_empty());

        svc.record(&uid, &alert(1)).await.unwrap();
        assert_eq!(live.next().await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_document_is_reported() {
        let repo = InMemoryRepository::new();
        let uid = UserId::new("u1");
        let path = DocPath::sos_history("app", &uid).unwrap();
        repo.set_document(
            &path,
            json!({"entries": "nope"}).as_object().cloned().unwrap(),
            WriteMode::Replace,
        )
        .await
        .unwrap();
        let svc = SosHistoryService::new(fixed_clock(), Arc::new(repo), "app");
        assert!(matches!(
            svc.list(&uid).await.unwrap_err(),
            SosHistoryServiceError::Malformed(_)
        ));
    }
}
