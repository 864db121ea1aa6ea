#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_session;
pub mod config;
pub mod contacts;
pub mod error;
pub mod identity;
pub mod incidents;
pub mod live;
pub mod onboarding;
pub mod sensors;
pub mod sos;
pub mod sos_history;
pub mod status;

pub use sheguard_core::Clock;

pub use app_services::AppServices;
pub use auth_session::AuthSession;
pub use config::ShellConfig;
pub use contacts::{EmergencyContactService, contacts_configured, decode_list};
pub use error::{
    AppServicesError, ContactServiceError, IdentityError, IncidentServiceError, SensorError,
    SosHistoryServiceError, SosSettingsServiceError,
};
pub use identity::{IdentityProvider, LocalIdentityProvider};
pub use incidents::IncidentReportService;
pub use live::LiveDocument;
pub use onboarding::OnboardingGate;
pub use sensors::{
    ConnectivityFeed, ConnectivitySensor, LocationSensor, ManualConnectivity, ReachabilitySensor,
    StaticLocationSensor,
};
pub use sos::{SosAlert, SosPreparation, SosService, SosSettingsService};
pub use sos_history::{SosHistoryService, decode_history};
pub use status::{StatusAggregator, StatusConfig};
