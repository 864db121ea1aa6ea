use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{IncidentId, UserId};

/// `reportedBy` value stored for reports filed anonymously.
pub const ANONYMOUS_REPORTER: &str = "anonymous";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentCategory {
    #[default]
    Harassment,
    Stalking,
    Other,
}

impl IncidentCategory {
    pub const ALL: [IncidentCategory; 3] = [Self::Harassment, Self::Stalking, Self::Other];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Harassment => "Harassment",
            Self::Stalking => "Stalking",
            Self::Other => "Other",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    /// Submitted and not yet looked at.
    #[default]
    Reported,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IncidentError {
    #[error("please describe what happened")]
    MissingDetails,
}

#[derive(Clone, Debug, Default)]
pub struct IncidentDraft {
    pub category: IncidentCategory,
    pub details: String,
    pub anonymous: bool,
}

/// A stored incident report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReport {
    pub id: IncidentId,
    pub category: IncidentCategory,
    pub details: String,
    pub is_anonymous: bool,
    /// The reporter's uid, or [`ANONYMOUS_REPORTER`].
    pub reported_by: String,
    pub reported_at: DateTime<Utc>,
    pub status: IncidentStatus,
}

impl IncidentDraft {
    #[must_use]
    pub fn new(category: IncidentCategory, details: impl Into<String>, anonymous: bool) -> Self {
        Self {
            category,
            details: details.into(),
            anonymous,
        }
    }

    /// Validate the draft and stamp it with reporter and time.
    ///
    /// # Errors
    ///
    /// Returns `IncidentError::MissingDetails` when the details are blank.
    pub fn validate(
        self,
        id: IncidentId,
        reporter: &UserId,
        at: DateTime<Utc>,
    ) -> Result<IncidentReport, IncidentError> {
        let details = self.details.trim().to_string();
        if details.is_empty() {
            return Err(IncidentError::MissingDetails);
        }
        let reported_by = if self.anonymous {
            ANONYMOUS_REPORTER.to_string()
        } else {
            reporter.as_str().to_string()
        };
        Ok(IncidentReport {
            id,
            category: self.category,
            details,
            is_anonymous: self.anonymous,
            reported_by,
            reported_at: at,
            status: IncidentStatus::Reported,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn blank_details_are_rejected() {
        let err = IncidentDraft::new(IncidentCategory::Stalking, "  \n", false)
            .validate(IncidentId::new("r1"), &UserId::new("u1"), fixed_now())
            .unwrap_err();
        assert_eq!(err, IncidentError::MissingDetails);
    }

    #[test]
    fn anonymous_reports_hide_the_reporter() {
        let named = IncidentDraft::new(IncidentCategory::Harassment, " followed home ", false)
            .validate(IncidentId::new("r1"), &UserId::new("u1"), fixed_now())
            .unwrap();
        assert_eq!(named.reported_by, "u1");
        assert_eq!(named.details, "followed home");
        assert_eq!(named.status, IncidentStatus::Reported);

        let hidden = IncidentDraft::new(IncidentCategory::Other, "x", true)
            .validate(IncidentId::new("r2"), &UserId::new("u1"), fixed_now())
            .unwrap();
        assert_eq!(hidden.reported_by, ANONYMOUS_REPORTER);
        assert!(hidden.is_anonymous);
    }

    #[test]
    fn stored_field_names() {
        let report = IncidentDraft::new(IncidentCategory::Stalking, "x", false)
            .validate(IncidentId::new("r1"), &UserId::new("u1"), fixed_now())
            .unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["category"], "Stalking");
        assert_eq!(value["isAnonymous"], false);
        assert_eq!(value["reportedBy"], "u1");
        assert_eq!(value["status"], "reported");
        assert!(value["reportedAt"].is_string());
    }
}
