use dioxus::prelude::*;
use sheguard_core::shell::{ExitChoice, ExitDecision};

use crate::context::{AppContext, ShellSignals};

#[component]
pub fn ExitPrompt() -> Element {
    let ctx = use_context::<AppContext>();
    let ShellSignals { mut shell, .. } = use_context::<ShellSignals>();

    let resolve = use_callback(move |choice: ExitChoice| {
        let decision = shell.write().resolve_exit_prompt(choice);
        if decision == ExitDecision::Exit {
            tracing::info!("exit confirmed");
            ctx.request_exit();
        }
    });

    rsx! {
        div { class: "modal-overlay",
            div { class: "modal", role: "alertdialog",
                h3 { "Hold on!" }
                p { "Are you sure you want to exit?" }
                div { class: "modal-actions",
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| resolve.call(ExitChoice::Cancel),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-danger",
                        r#type: "button",
                        onclick: move |_| resolve.call(ExitChoice::Confirm),
                        "Exit"
                    }
                }
            }
        }
    }
}
