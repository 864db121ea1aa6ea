mod contact;
mod doc_path;
mod identity;
mod ids;
mod incident;
mod onboarding;
mod readiness;
mod sos;
mod sos_history;

pub use ids::{ContactId, IncidentId, SosHistoryId, UserId};

pub use contact::{
    ContactError, ContactList, EmergencyContact, EmergencyContactDraft, MAX_EMERGENCY_CONTACTS,
};
pub use doc_path::{DocPath, DocPathError};
pub use identity::{AuthState, Session, UserIdentity};
pub use incident::{
    ANONYMOUS_REPORTER, IncidentCategory, IncidentDraft, IncidentError, IncidentReport,
    IncidentStatus,
};
pub use onboarding::{ONBOARDING_FLAG_KEY, OnboardingState, OnboardingStatus};
pub use readiness::{ConnectivityEvent, LocationPermission, ReadinessSnapshot, location_enabled};
pub use sos::{DEFAULT_SOS_MESSAGE, SosSettings, SosSettingsDraft, SosSettingsError};
pub use sos_history::{SosHistory, SosHistoryEntry, SosHistoryError};
