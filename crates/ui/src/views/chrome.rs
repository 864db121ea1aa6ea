use dioxus::prelude::*;

use crate::context::ShellSignals;

/// Title bar for every screen except Home, with a back control.
#[component]
pub fn ScreenHeader(title: &'static str) -> Element {
    let ShellSignals { mut shell, .. } = use_context::<ShellSignals>();
    rsx! {
        header { class: "screen-header",
            button {
                class: "screen-back",
                r#type: "button",
                onclick: move |_| shell.write().go_back(),
                "← Back"
            }
            h2 { class: "screen-title", "{title}" }
        }
    }
}
