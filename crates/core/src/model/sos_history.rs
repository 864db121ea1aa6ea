use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SosHistoryId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SosHistoryEntry {
    pub id: SosHistoryId,
    pub timestamp: DateTime<Utc>,
    /// Alert text that went out.
    pub message: String,
    /// How many contacts the alert was addressed to.
    pub recipients: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SosHistoryError {
    #[error("history entry not found")]
    NotFound,
}

/// A user's sent alerts, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SosHistory {
    #[serde(default)]
    entries: Vec<SosHistoryEntry>,
}

impl SosHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored entries in any order.
    #[must_use]
    pub fn from_persisted(mut entries: Vec<SosHistoryEntry>) -> Self {
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[SosHistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<SosHistoryEntry> {
        self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert keeping newest-first order. Equal timestamps keep the newer
    /// insert in front.
    pub fn record(&mut self, entry: SosHistoryEntry) {
        let idx = self
            .entries
            .iter()
            .position(|e| e.timestamp <= entry.timestamp)
            .unwrap_or(self.entries.len());
        self.entries.insert(idx, entry);
    }

    /// # Errors
    ///
    /// Returns `SosHistoryError::NotFound` if no entry has the given id.
    pub fn remove(&mut self, id: &SosHistoryId) -> Result<SosHistoryEntry, SosHistoryError> {
        let idx = self
            .entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or(SosHistoryError::NotFound)?;
        Ok(self.entries.remove(idx))
    }
}
