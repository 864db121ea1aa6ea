//! Shared error types for the services crate.

use thiserror::Error;

use sheguard_core::model::{
    ContactError, DocPathError, IncidentError, SosHistoryError, SosSettingsError,
};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by identity providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IdentityError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    AccountExists,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by device status sensors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SensorError {
    #[error("sensor unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted by `EmergencyContactService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContactServiceError {
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error(transparent)]
    Path(#[from] DocPathError),
    #[error("stored contact list is malformed: {0}")]
    Malformed(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SosSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SosSettingsServiceError {
    #[error(transparent)]
    Validation(#[from] SosSettingsError),
    #[error(transparent)]
    Path(#[from] DocPathError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SosHistoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SosHistoryServiceError {
    #[error(transparent)]
    History(#[from] SosHistoryError),
    #[error(transparent)]
    Path(#[from] DocPathError),
    #[error("stored sos history is malformed: {0}")]
    Malformed(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `IncidentReportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IncidentServiceError {
    #[error(transparent)]
    Validation(#[from] IncidentError),
    #[error(transparent)]
    Path(#[from] DocPathError),
    #[error("incident report could not be encoded: {0}")]
    Malformed(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
}
