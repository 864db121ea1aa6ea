use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::auth_session::AuthSession;
use crate::config::ShellConfig;
use crate::contacts::EmergencyContactService;
use crate::error::AppServicesError;
use crate::identity::{IdentityProvider, LocalIdentityProvider};
use crate::incidents::IncidentReportService;
use crate::onboarding::OnboardingGate;
use crate::sensors::{ConnectivitySensor, LocationSensor};
use crate::sos::{SosService, SosSettingsService};
use crate::sos_history::SosHistoryService;
use crate::status::{StatusAggregator, StatusConfig};

/// Assembles the shell-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    config: ShellConfig,
    onboarding: Arc<OnboardingGate>,
    auth: Arc<AuthSession>,
    status: Arc<StatusAggregator>,
    contacts: Arc<EmergencyContactService>,
    sos_settings: Arc<SosSettingsService>,
    sos: Arc<SosService>,
    sos_history: Arc<SosHistoryService>,
    incidents: Arc<IncidentReportService>,
}

impl AppServices {
    /// Wire the services together. Without an identity provider the session
    /// resolves immediately with no user. Status tracking waits for the
    /// onboarding gate's first read. Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(
        storage: Storage,
        identity_provider: Option<Arc<dyn IdentityProvider>>,
        location: Arc<dyn LocationSensor>,
        connectivity: Arc<dyn ConnectivitySensor>,
        config: ShellConfig,
    ) -> Self {
        let clock = Clock::system();
        let onboarding = Arc::new(OnboardingGate::new(Arc::clone(&storage.flags)));
        let auth = match identity_provider {
            Some(provider) => AuthSession::start(provider),
            None => AuthSession::disabled(),
        };
        let status = Arc::new(StatusAggregator::new(
            location,
            connectivity,
            Arc::clone(&storage.documents),
            StatusConfig::from(&config),
        ));
        status.follow_after_gate(onboarding.subscribe(), auth.subscribe());

        let contacts =
            EmergencyContactService::new(Arc::clone(&storage.documents), config.app_id.clone());
        let sos_settings =
            SosSettingsService::new(Arc::clone(&storage.documents), config.app_id.clone());
        let sos_history = SosHistoryService::new(
            clock,
            Arc::clone(&storage.documents),
            config.app_id.clone(),
        );
        let sos = Arc::new(SosService::new(
            contacts.clone(),
            sos_settings.clone(),
            sos_history.clone(),
        ));
        let incidents =
            IncidentReportService::new(clock, Arc::clone(&storage.documents), config.app_id.clone());

        Self {
            config,
            onboarding,
            auth,
            status,
            contacts: Arc::new(contacts),
            sos_settings: Arc::new(sos_settings),
            sos,
            sos_history: Arc::new(sos_history),
            incidents: Arc::new(incidents),
        }
    }

    /// Build services backed by `SQLite` storage and the local identity provider.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        location: Arc<dyn LocationSensor>,
        connectivity: Arc<dyn ConnectivitySensor>,
        config: ShellConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let provider = LocalIdentityProvider::restored(
            Arc::clone(&storage.flags),
            Arc::clone(&storage.documents),
        )
        .await;
        Ok(Self::new(
            storage,
            Some(Arc::new(provider)),
            location,
            connectivity,
            config,
        ))
    }

    #[must_use]
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    #[must_use]
    pub fn onboarding(&self) -> Arc<OnboardingGate> {
        Arc::clone(&self.onboarding)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthSession> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn status(&self) -> Arc<StatusAggregator> {
        Arc::clone(&self.status)
    }

    #[must_use]
    pub fn contacts(&self) -> Arc<EmergencyContactService> {
        Arc::clone(&self.contacts)
    }

    #[must_use]
    pub fn sos_settings(&self) -> Arc<SosSettingsService> {
        Arc::clone(&self.sos_settings)
    }

    #[must_use]
    pub fn sos(&self) -> Arc<SosService> {
        Arc::clone(&self.sos)
    }

    #[must_use]
    pub fn sos_history(&self) -> Arc<SosHistoryService> {
        Arc::clone(&self.sos_history)
    }

    #[must_use]
    pub fn incidents(&self) -> Arc<IncidentReportService> {
        Arc::clone(&self.incidents)
    }

    /// Release every status feed.
    pub fn shutdown(&self) {
        self.status.shutdown();
    }
}
