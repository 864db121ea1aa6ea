use dioxus::prelude::*;

#[component]
pub fn LoadingView() -> Element {
    rsx! {
        div { class: "loading",
            div { class: "spinner" }
            p { "Loading..." }
        }
    }
}
