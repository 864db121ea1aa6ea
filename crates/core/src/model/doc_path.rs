use std::fmt;

use thiserror::Error;

use super::{IncidentId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocPathError {
    #[error("document path is empty")]
    Empty,
    #[error("document path segment {index} is empty or contains '/'")]
    InvalidSegment { index: usize },
}

/// Slash-separated path of a document in the document store.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath(String);

impl DocPath {
    /// Build a path from individual segments.
    ///
    /// # Errors
    ///
    /// Returns `DocPathError` if there are no segments or a segment is blank or
    /// contains a slash.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, DocPathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parts = Vec::new();
        for (index, segment) in segments.into_iter().enumerate() {
            let segment = segment.as_ref();
            if segment.trim().is_empty() || segment.contains('/') {
                return Err(DocPathError::InvalidSegment { index });
            }
            parts.push(segment.to_string());
        }
        if parts.is_empty() {
            return Err(DocPathError::Empty);
        }
        Ok(Self(parts.join("/")))
    }

    /// Parse a stored path string.
    ///
    /// # Errors
    ///
    /// Same as [`DocPath::from_segments`].
    pub fn parse(raw: &str) -> Result<Self, DocPathError> {
        Self::from_segments(raw.split('/'))
    }

    /// `artifacts/{app_id}/users/{uid}/emergency_contacts/contacts`
    ///
    /// # Errors
    ///
    /// Returns `DocPathError` if `app_id` or `uid` is not a valid segment.
    pub fn emergency_contacts(app_id: &str, uid: &UserId) -> Result<Self, DocPathError> {
        Self::from_segments([
            "artifacts",
            app_id,
            "users",
            uid.as_str(),
            "emergency_contacts",
            "contacts",
        ])
    }

    /// `artifacts/{app_id}/users/{uid}/settings/sos`
    ///
    /// # Errors
    ///
    /// Returns `DocPathError` if `app_id` or `uid` is not a valid segment.
    pub fn sos_settings(app_id: &str, uid: &UserId) -> Result<Self, DocPathError> {
        Self::from_segments(["artifacts", app_id, "users", uid.as_str(), "settings", "sos"])
    }

    /// `artifacts/{app_id}/users/{uid}/sos_history/entries`
    ///
    /// # Errors
    ///
    /// Returns `DocPathError` if `app_id` or `uid` is not a valid segment.
    pub fn sos_history(app_id: &str, uid: &UserId) -> Result<Self, DocPathError> {
        Self::from_segments([
            "artifacts",
            app_id,
            "users",
            uid.as_str(),
            "sos_history",
            "entries",
        ])
    }

    /// `artifacts/{app_id}/public/data/incidents/{id}`. Reports are shared
    /// across users, one document each.
    ///
    /// # Errors
    ///
    /// Returns `DocPathError` if `app_id` or `id` is not a valid segment.
    pub fn incident(app_id: &str, id: &IncidentId) -> Result<Self, DocPathError> {
        Self::from_segments([
            "artifacts",
            app_id,
            "public",
            "data",
            "incidents",
            id.as_str(),
        ])
    }

    /// `identity/accounts/{email}`
    ///
    /// # Errors
    ///
    /// Returns `DocPathError` if the email is not a valid segment.
    pub fn account(email: &str) -> Result<Self, DocPathError> {
        Self::from_segments(["identity", "accounts", email])
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocPath({})", self.0)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_per_user_paths() {
        let uid = UserId::new("abc");
        assert_eq!(
            DocPath::emergency_contacts("app", &uid).unwrap().as_str(),
            "artifacts/app/users/abc/emergency_contacts/contacts"
        );
        assert_eq!(
            DocPath::sos_settings("app", &uid).unwrap().as_str(),
            "artifacts/app/users/abc/settings/sos"
        );
        assert_eq!(
            DocPath::sos_history("app", &uid).unwrap().as_str(),
            "artifacts/app/users/abc/sos_history/entries"
        );
        assert_eq!(
            DocPath::incident("app", &IncidentId::new("r1")).unwrap().as_str(),
            "artifacts/app/public/data/incidents/r1"
        );
    }

    #[test]
    fn rejects_blank_or_nested_segments() {
        assert_eq!(
            DocPath::emergency_contacts("", &UserId::new("abc")),
            Err(DocPathError::InvalidSegment { index: 1 })
        );
        assert_eq!(
            DocPath::account("a/b"),
            Err(DocPathError::InvalidSegment { index: 2 })
        );
        assert_eq!(DocPath::parse("a//b"), Err(DocPathError::InvalidSegment { index: 1 }));
        assert_eq!(
            DocPath::from_segments(Vec::<String>::new()),
            Err(DocPathError::Empty)
        );
    }
}
