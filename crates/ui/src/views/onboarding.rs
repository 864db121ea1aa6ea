use dioxus::prelude::*;

use crate::context::{AppContext, ShellSignals};
use crate::views::AuthForm;

const INTRO_TILES: [(&str, &str); 3] = [
    (
        "Welcome to SheGuard+",
        "Your personal safety companion, designed to protect and empower.",
    ),
    (
        "One-Tap SOS",
        "In an emergency, press the SOS button to instantly alert your trusted contacts with your live location.",
    ),
    (
        "Your Privacy Matters",
        "Your data, including location and contacts, is kept private and is only used when you trigger an SOS alert.",
    ),
];

const TILE_COUNT: usize = INTRO_TILES.len() + 1;

/// First-run carousel. The last tile signs the user in and completes onboarding.
#[component]
pub fn OnboardingView() -> Element {
    let ctx = use_context::<AppContext>();
    let ShellSignals { mut shell, .. } = use_context::<ShellSignals>();
    let mut step = use_signal(|| 0_usize);

    let gate = ctx.onboarding();
    let has_provider = ctx.auth().provider().is_some();
    let complete = use_callback(move |()| {
        let gate = gate.clone();
        spawn(async move {
            let status = gate.complete().await;
            shell.write().set_onboarding(status);
        });
    });

    let current = step();
    rsx! {
        div { class: "onboarding",
            div { class: "onboarding-tile",
                if let Some((title, subtitle)) = INTRO_TILES.get(current) {
                    h1 { class: "onboarding-title", "{title}" }
                    p { class: "onboarding-subtitle", "{subtitle}" }
                } else if has_provider {
                    AuthForm { on_success: complete }
                } else {
                    h1 { class: "onboarding-title", "You're all set" }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| complete.call(()),
                        "Continue"
                    }
                }
            }
            div { class: "onboarding-controls",
                button {
                    class: "btn-link",
                    r#type: "button",
                    disabled: current == 0,
                    onclick: move |_| step.set(current.saturating_sub(1)),
                    "Back"
                }
                div { class: "pagination",
                    for index in 0..TILE_COUNT {
                        span {
                            key: "{index}",
                            class: if index == current { "dot dot--active" } else { "dot" },
                        }
                    }
                }
                button {
                    class: "btn-link",
                    r#type: "button",
                    disabled: current + 1 >= TILE_COUNT,
                    onclick: move |_| step.set((current + 1).min(TILE_COUNT - 1)),
                    "Next"
                }
            }
        }
    }
}
