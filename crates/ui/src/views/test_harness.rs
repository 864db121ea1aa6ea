use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{
    AppServices, IdentityProvider, LocalIdentityProvider, ManualConnectivity, ShellConfig,
    StaticLocationSensor,
};
use sheguard_core::model::{
    ConnectivityEvent, LocationPermission, OnboardingStatus, ReadinessSnapshot, Session, UserId,
    UserIdentity,
};
use sheguard_core::nav::Screen;
use sheguard_core::shell::ShellState;
use storage::repository::Storage;

use crate::app::{App, ShellRoot};
use crate::context::{ShellSignals, UiApp, build_app_context};

pub const TEST_APP_ID: &str = "ui-test";

struct TestApp {
    services: AppServices,
    exits: AtomicUsize,
}

impl UiApp for TestApp {
    fn app_services(&self) -> AppServices {
        self.services.clone()
    }

    fn request_exit(&self) {
        self.exits.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Props, Clone)]
struct AppHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for AppHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn AppHarness(props: AppHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { App {} }
}

#[derive(Props, Clone)]
struct ShellHarnessProps {
    app: Arc<TestApp>,
    shell: ShellState,
    session: Session,
    readiness: ReadinessSnapshot,
    login_reason: Option<&'static str>,
}

impl PartialEq for ShellHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ShellHarness(props: ShellHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| {
        let mut signals = ShellSignals::new(props.shell, props.session.clone(), props.readiness);
        signals.login_reason.set(props.login_reason);
        signals
    });
    rsx! { ShellRoot {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..5 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub struct HarnessOptions {
    pub with_identity: bool,
}

async fn test_app(storage: &Storage, options: &HarnessOptions) -> Arc<TestApp> {
    let provider: Option<Arc<dyn IdentityProvider>> = if options.with_identity {
        Some(Arc::new(
            LocalIdentityProvider::restored(
                Arc::clone(&storage.flags),
                Arc::clone(&storage.documents),
            )
            .await,
        ))
    } else {
        None
    };
    let services = AppServices::new(
        storage.clone(),
        provider,
        Arc::new(StaticLocationSensor::new(LocationPermission::Granted, true)),
        Arc::new(ManualConnectivity::new(ConnectivityEvent::online())),
        ShellConfig::new(TEST_APP_ID),
    );
    Arc::new(TestApp {
        services,
        exits: AtomicUsize::new(0),
    })
}

/// Render the full `App` over `storage`, starting from a cold launch.
pub async fn setup_app_harness(storage: Storage, options: HarnessOptions) -> ViewHarness {
    let app = test_app(&storage, &options).await;
    let dom = VirtualDom::new_with_props(AppHarness, AppHarnessProps { app });
    ViewHarness { dom, storage }
}

/// Render the shell body with fixed signal values.
pub async fn setup_shell_harness(
    shell: ShellState,
    session: Session,
    readiness: ReadinessSnapshot,
) -> ViewHarness {
    shell_harness(shell, session, readiness, None).await
}

/// Render the login screen as if another view had sent the user there.
pub async fn setup_login_harness(reason: &'static str) -> ViewHarness {
    let mut shell = completed_shell();
    shell.navigate_to(Screen::Login);
    shell_harness(
        shell,
        anonymous_session(),
        ReadinessSnapshot::default(),
        Some(reason),
    )
    .await
}

async fn shell_harness(
    shell: ShellState,
    session: Session,
    readiness: ReadinessSnapshot,
    login_reason: Option<&'static str>,
) -> ViewHarness {
    let storage = Storage::in_memory();
    let app = test_app(&storage, &HarnessOptions { with_identity: true }).await;
    let dom = VirtualDom::new_with_props(
        ShellHarness,
        ShellHarnessProps {
            app,
            shell,
            session,
            readiness,
            login_reason,
        },
    );
    ViewHarness { dom, storage }
}

pub fn completed_shell() -> ShellState {
    let mut shell = ShellState::new();
    shell.set_onboarding(OnboardingStatus::Completed);
    shell
}

pub fn registered_session(uid: &str, email: &str) -> Session {
    Session::resolved(Some(UserIdentity::registered(UserId::new(uid), email)))
}

pub fn anonymous_session() -> Session {
    Session::resolved(Some(UserIdentity::anonymous(UserId::new("anon"))))
}
