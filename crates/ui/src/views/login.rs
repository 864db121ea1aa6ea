use dioxus::prelude::*;

use crate::context::ShellSignals;
use crate::views::{AuthForm, ScreenHeader};

#[component]
pub fn LoginView() -> Element {
    let ShellSignals {
        mut shell,
        mut login_reason,
        ..
    } = use_context::<ShellSignals>();
    rsx! {
        div { class: "page",
            ScreenHeader { title: "Login" }
            if let Some(reason) = login_reason() {
                p { class: "login-reason", "{reason}" }
            }
            AuthForm {
                on_success: move |()| {
                    login_reason.set(None);
                    shell.write().go_back();
                },
            }
        }
    }
}
