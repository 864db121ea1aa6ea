use std::sync::Arc;

use dioxus::prelude::*;
use services::{
    AppServices, AuthSession, EmergencyContactService, IncidentReportService, OnboardingGate,
    SosHistoryService, SosService, SosSettingsService, StatusAggregator,
};
use sheguard_core::model::{ReadinessSnapshot, Session};
use sheguard_core::nav::Screen;
use sheguard_core::shell::ShellState;

/// Implemented by the composition root (`crates/app`).
pub trait UiApp: Send + Sync {
    fn app_services(&self) -> AppServices;

    /// Terminate the process after the user confirmed the exit prompt.
    fn request_exit(&self);
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    services: AppServices,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app: Arc::clone(app),
            services: app.app_services(),
        }
    }

    #[must_use]
    pub fn services(&self) -> &AppServices {
        &self.services
    }

    #[must_use]
    pub fn onboarding(&self) -> Arc<OnboardingGate> {
        self.services.onboarding()
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthSession> {
        self.services.auth()
    }

    #[must_use]
    pub fn status(&self) -> Arc<StatusAggregator> {
        self.services.status()
    }

    #[must_use]
    pub fn contacts(&self) -> Arc<EmergencyContactService> {
        self.services.contacts()
    }

    #[must_use]
    pub fn sos_settings(&self) -> Arc<SosSettingsService> {
        self.services.sos_settings()
    }

    #[must_use]
    pub fn sos(&self) -> Arc<SosService> {
        self.services.sos()
    }

    #[must_use]
    pub fn sos_history(&self) -> Arc<SosHistoryService> {
        self.services.sos_history()
    }

    #[must_use]
    pub fn incidents(&self) -> Arc<IncidentReportService> {
        self.services.incidents()
    }

    pub fn request_exit(&self) {
        self.services.shutdown();
        self.app.request_exit();
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Shell state shared with every view. Only the root component's tasks and
/// handlers write `session` and `readiness`.
#[derive(Clone, Copy, PartialEq)]
pub struct ShellSignals {
    pub shell: Signal<ShellState>,
    pub session: Signal<Session>,
    pub readiness: Signal<ReadinessSnapshot>,
    /// Why the user was sent to the login screen. Cleared once they sign in.
    pub login_reason: Signal<Option<&'static str>>,
}

impl ShellSignals {
    /// Allocate the signals in the current component scope.
    #[must_use]
    pub fn new(shell: ShellState, session: Session, readiness: ReadinessSnapshot) -> Self {
        Self {
            shell: Signal::new(shell),
            session: Signal::new(session),
            readiness: Signal::new(readiness),
            login_reason: Signal::new(None),
        }
    }

    /// Send the user to the login screen with a reason shown above the form.
    pub fn require_login(mut self, reason: &'static str) {
        self.login_reason.set(Some(reason));
        self.shell.write().navigate_to(Screen::Login);
    }
}
