use dioxus::prelude::*;
use sheguard_core::model::{IncidentCategory, IncidentDraft};
use sheguard_core::nav::Screen;

use crate::context::{AppContext, ShellSignals};
use crate::views::ScreenHeader;

#[component]
pub fn ReportView() -> Element {
    let ctx = use_context::<AppContext>();
    let ShellSignals {
        mut shell, session, ..
    } = use_context::<ShellSignals>();
    let mut category = use_signal(IncidentCategory::default);
    let mut details = use_signal(String::new);
    let mut anonymous = use_signal(|| false);
    let mut submitting = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let reporter = session.read().uid().cloned();
    let signed_in = reporter.is_some();

    let incidents = ctx.incidents();
    let submit = move |_| {
        let Some(reporter) = reporter.clone() else {
            return;
        };
        if submitting() {
            return;
        }
        let incidents = incidents.clone();
        let draft = IncidentDraft::new(category(), details(), anonymous());
        submitting.set(true);
        spawn(async move {
            match incidents.submit(&reporter, draft).await {
                Ok(_) => {
                    details.set(String::new());
                    error.set(None);
                    shell.write().go_back();
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            submitting.set(false);
        });
    };

    rsx! {
        div { class: "page",
            ScreenHeader { title: Screen::Report.title() }
            p { class: "form-label", "Category" }
            div { class: "category-chips",
                for option in IncidentCategory::ALL {
                    button {
                        key: "{option.label()}",
                        class: if category() == option { "category-chip category-chip--selected" } else { "category-chip" },
                        r#type: "button",
                        onclick: move |_| category.set(option),
                        "{option.label()}"
                    }
                }
            }
            p { class: "form-label", "Please provide details" }
            textarea {
                class: "text-input text-input--multiline",
                placeholder: "Describe what happened...",
                value: "{details}",
                oninput: move |evt| details.set(evt.value()),
            }
            label { class: "checkbox-row",
                input {
                    r#type: "checkbox",
                    checked: anonymous(),
                    onchange: move |evt| anonymous.set(evt.checked()),
                }
                "Report Anonymously"
            }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
            }
            if signed_in {
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: submitting(),
                    onclick: submit,
                    if submitting() { "Submitting..." } else { "Submit Report" }
                }
            } else {
                p { "Sign in to file a report." }
            }
        }
    }
}
