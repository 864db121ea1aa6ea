use dioxus::prelude::*;
use sheguard_core::nav::Screen;

use crate::context::ShellSignals;
use crate::views::ScreenHeader;
use crate::views::menu::use_logout;

#[component]
pub fn ProfileView() -> Element {
    let ShellSignals { mut shell, session, .. } = use_context::<ShellSignals>();
    let logout = use_logout();

    let current = session.read().clone();
    let registered = current.registered_identity().is_some();
    let shown = match current.identity.as_ref() {
        Some(identity) if identity.is_anonymous() => "Anonymous User".to_string(),
        Some(identity) => identity.email().unwrap_or_default().to_string(),
        None => "Not signed in".to_string(),
    };

    rsx! {
        div { class: "page",
            ScreenHeader { title: "My Profile" }
            div { class: "profile-card",
                p { class: "profile-label", "Logged in as:" }
                p { class: "profile-email", "{shown}" }
            }
            if registered {
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    onclick: move |_| logout.call(()),
                    "Logout"
                }
            } else {
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| shell.write().navigate_to(Screen::Login),
                    "Login / Sign Up"
                }
            }
        }
    }
}
