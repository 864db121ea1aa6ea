//! Incident reports filed into the shared public collection.

use std::sync::Arc;

use serde_json::Value;
use sheguard_core::Clock;
use sheguard_core::model::{DocPath, IncidentDraft, IncidentId, IncidentReport, UserId};
use storage::document::WriteMode;
use storage::repository::DocumentStore;

use crate::error::IncidentServiceError;

#[derive(Clone)]
pub struct IncidentReportService {
    clock: Clock,
    documents: Arc<dyn DocumentStore>,
    app_id: String,
}

impl IncidentReportService {
    #[must_use]
    pub fn new(clock: Clock, documents: Arc<dyn DocumentStore>, app_id: impl Into<String>) -> Self {
        Self {
            clock,
            documents,
            app_id: app_id.into(),
        }
    }

    /// Validate and store a new report filed by `reporter`.
    ///
    /// # Errors
    ///
    /// Returns `IncidentServiceError::Validation` for blank details or a
    /// storage error if the write fails.
    pub async fn submit(
        &self,
        reporter: &UserId,
        draft: IncidentDraft,
    ) -> Result<IncidentReport, IncidentServiceError> {
        let report = draft.validate(IncidentId::generate(), reporter, self.clock.now())?;
        let path = DocPath::incident(&self.app_id, &report.id)?;
        let Value::Object(doc) = serde_json::to_value(&report)
            .map_err(|err| IncidentServiceError::Malformed(err.to_string()))?
        else {
            return Err(IncidentServiceError::Malformed("report is not an object".into()));
        };
        self.documents
            .set_document(&path, doc, WriteMode::Replace)
            .await?;
        tracing::info!(
            id = %report.id,
            category = report.category.label(),
            anonymous = report.is_anonymous,
            "incident reported"
        );
        Ok(report)
    }

    /// # Errors
    ///
    /// Returns `IncidentServiceError` on storage failures or a malformed document.
    pub async fn load(&self, id: &IncidentId) -> Result<Option<IncidentReport>, IncidentServiceError> {
        let path = DocPath::incident(&self.app_id, id)?;
        self.documents
            .get_document(&path)
            .await?
            .map(|doc| {
                serde_json::from_value(Value::Object(doc))
                    .map_err(|err| IncidentServiceError::Malformed(err.to_string()))
            })
            .transpose()
    }
}
