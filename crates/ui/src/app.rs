use dioxus::prelude::*;
use sheguard_core::nav::Screen;
use sheguard_core::shell::{BackOutcome, ShellState, ShellView};

use crate::context::{AppContext, ShellSignals};
use crate::views::{
    ContactsView, ExitPrompt, HistoryView, HomeView, InfoView, LoadingView, LoginView,
    OnboardingView, ProfileView, ReportView, SettingsView, SideMenu,
};

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context_provider(|| {
        ShellSignals::new(
            ShellState::new(),
            ctx.auth().current(),
            ctx.status().snapshot(),
        )
    });
    use_shell_feeds(&ctx, signals);

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "SheGuard+" }

        ErrorBoundary {
            handle_error: |errors: ErrorContext| rsx! {
                div { class: "fatal",
                    h1 { "Something went wrong" }
                    pre { "{errors:?}" }
                }
            },
            ShellRoot {}
        }
    }
}

/// Mirror the onboarding gate, auth session and readiness snapshot into the
/// shell signals. These tasks are the only writers of `session` and `readiness`.
fn use_shell_feeds(ctx: &AppContext, signals: ShellSignals) {
    let ShellSignals {
        mut shell,
        mut session,
        mut readiness,
        ..
    } = signals;

    let gate = ctx.onboarding();
    use_future(move || {
        let gate = gate.clone();
        async move {
            gate.check().await;
            let mut statuses = gate.subscribe();
            loop {
                let status = *statuses.borrow_and_update();
                shell.write().set_onboarding(status);
                if statuses.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    let auth = ctx.auth();
    use_future(move || {
        let auth = auth.clone();
        async move {
            let mut sessions = auth.subscribe();
            loop {
                let next = sessions.borrow_and_update().clone();
                session.set(next);
                if sessions.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    let status = ctx.status();
    use_future(move || {
        let status = status.clone();
        async move {
            let mut snapshots = status.subscribe();
            loop {
                let next = *snapshots.borrow_and_update();
                readiness.set(next);
                if snapshots.changed().await.is_err() {
                    break;
                }
            }
        }
    });
}

/// `Escape`, or `Alt+ArrowLeft`, acts as the system back action.
#[must_use]
pub fn is_back_key(key: &Key, modifiers: Modifiers) -> bool {
    match key {
        Key::Escape => true,
        Key::ArrowLeft => modifiers.contains(Modifiers::ALT),
        _ => false,
    }
}

/// Shell body: loading, onboarding or the current screen with its overlays.
#[component]
pub fn ShellRoot() -> Element {
    let ShellSignals { mut shell, session, .. } = use_context::<ShellSignals>();

    let on_key = move |evt: KeyboardEvent| {
        if !is_back_key(&evt.data.key(), evt.data.modifiers()) {
            return;
        }
        evt.prevent_default();
        let outcome: BackOutcome = shell.write().handle_back();
        tracing::debug!(?outcome, "back action");
    };

    let state = *shell.read();
    let view = if session.read().ready {
        state.view()
    } else {
        ShellView::Loading
    };

    rsx! {
        div { class: "app-root", tabindex: "0", autofocus: true, onkeydown: on_key,
            match view {
                ShellView::Loading => rsx! { LoadingView {} },
                ShellView::Onboarding => rsx! { OnboardingView {} },
                ShellView::Main(screen) => rsx! {
                    ScreenView { screen }
                    if state.menu_open() {
                        SideMenu {}
                    }
                    if state.exit_prompt_open() {
                        ExitPrompt {}
                    }
                },
            }
        }
    }
}

#[component]
fn ScreenView(screen: Screen) -> Element {
    match screen {
        Screen::Home => rsx! { HomeView {} },
        Screen::Contacts => rsx! { ContactsView {} },
        Screen::Settings => rsx! { SettingsView {} },
        Screen::Login => rsx! { LoginView {} },
        Screen::Profile => rsx! { ProfileView {} },
        Screen::History => rsx! { HistoryView {} },
        Screen::Report => rsx! { ReportView {} },
        other => rsx! { InfoView { screen: other } },
    }
}
