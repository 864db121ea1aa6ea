use dioxus::prelude::*;
use services::SosPreparation;
use sheguard_core::nav::Screen;

use crate::context::{AppContext, ShellSignals};
use crate::views::LOAD_FAILED;
use crate::vm::{map_status_tiles, sos_notice};

const QUICK_ACTIONS: [(&str, Screen); 6] = [
    ("Live Location Sharing", Screen::LiveShare),
    ("Live Location & Camera", Screen::LiveCam),
    ("Voice Message Incident", Screen::VoiceReport),
    ("Body Shaming/Harassment", Screen::Report),
    ("Common Problems", Screen::Resources),
    ("24x7 Instant Chat", Screen::GeminiHelp),
];

const SOS_LOGIN_REASON: &str = "Please log in to use the SOS feature.";

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<ShellSignals>();
    let ShellSignals {
        mut shell,
        session,
        readiness,
        ..
    } = signals;
    let mut notice = use_signal(|| None::<String>);

    let sos = ctx.sos();
    let on_sos = move |_| {
        let sos = sos.clone();
        let current = session.read().clone();
        spawn(async move {
            match sos.trigger(&current).await {
                Ok(SosPreparation::LoginRequired) => {
                    notice.set(None);
                    signals.require_login(SOS_LOGIN_REASON);
                }
                Ok(preparation) => notice.set(sos_notice(&preparation)),
                Err(err) => {
                    tracing::warn!(error = %err, "sos preparation failed");
                    notice.set(Some(LOAD_FAILED.to_string()));
                }
            }
        });
    };

    let tiles = map_status_tiles(&readiness.read());

    rsx! {
        div { class: "page page--home",
            header { class: "home-header",
                button {
                    class: "icon-btn",
                    r#type: "button",
                    title: "Menu",
                    onclick: move |_| shell.write().toggle_menu(),
                    "☰"
                }
                h1 { class: "home-title", "SheGuard+" }
                button {
                    class: "icon-btn",
                    r#type: "button",
                    title: "Settings",
                    onclick: move |_| shell.write().navigate_to(Screen::Settings),
                    "⚙"
                }
            }
            p { class: "greeting", "Welcome, stay safe." }
            p { class: "sub-greeting", "Press the button below in case of emergency." }

            button { class: "sos-button", r#type: "button", onclick: on_sos,
                span { class: "sos-label", "SOS" }
                span { class: "sos-sub", "\"Bachao!\"" }
            }
            if let Some(message) = notice() {
                p { class: "sos-notice", "{message}" }
            }

            div { class: "status-grid",
                for tile in tiles {
                    button {
                        key: "{tile.label}",
                        class: if tile.enabled { "status-tile status-tile--on" } else { "status-tile" },
                        r#type: "button",
                        onclick: move |_| {
                            if let Some(target) = tile.target {
                                shell.write().navigate_to(target);
                            }
                        },
                        "{tile.label}"
                    }
                }
            }

            div { class: "quick-actions",
                for (label, screen) in QUICK_ACTIONS {
                    button {
                        key: "{label}",
                        class: "quick-action",
                        r#type: "button",
                        onclick: move |_| shell.write().navigate_to(screen),
                        "{label}"
                    }
                }
            }
            button {
                class: "btn btn-primary call-button",
                r#type: "button",
                onclick: move |_| shell.write().navigate_to(Screen::Helpline),
                "Call Us"
            }
        }
    }
}
