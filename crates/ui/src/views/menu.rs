use dioxus::prelude::*;

use crate::context::{AppContext, ShellSignals};
use crate::vm::{MenuAction, map_menu};

/// Sign out, then close the menu and return home.
pub(crate) fn use_logout() -> Callback<()> {
    let ctx = use_context::<AppContext>();
    let ShellSignals { mut shell, .. } = use_context::<ShellSignals>();
    use_callback(move |()| {
        let auth = ctx.auth();
        spawn(async move {
            if let Err(err) = auth.logout().await {
                tracing::warn!(error = %err, "logout failed");
            }
            shell.write().on_logout();
        });
    })
}

#[component]
pub fn SideMenu() -> Element {
    let ShellSignals { mut shell, session, .. } = use_context::<ShellSignals>();
    let logout = use_logout();
    let menu = map_menu(&session.read());

    rsx! {
        div {
            class: "menu-overlay",
            onclick: move |_| shell.write().close_menu(),
            nav {
                class: "side-menu",
                onclick: move |evt| evt.stop_propagation(),
                div { class: "menu-header",
                    h2 { class: "menu-title", "SheGuard+" }
                    if let Some(email) = menu.email.clone() {
                        p { class: "menu-email", "{email}" }
                    }
                }
                ul { class: "menu-items",
                    for entry in menu.entries {
                        li { key: "{entry.label}",
                            button {
                                class: if entry.action == MenuAction::Logout {
                                    "menu-item menu-item--logout"
                                } else {
                                    "menu-item"
                                },
                                r#type: "button",
                                onclick: move |_| match entry.action {
                                    MenuAction::Navigate(screen) => shell.write().navigate_to(screen),
                                    MenuAction::Logout => logout.call(()),
                                },
                                "{entry.label}"
                            }
                        }
                    }
                }
            }
        }
    }
}
