use dioxus::prelude::*;
use sheguard_core::model::{SosHistory, SosHistoryEntry, UserId};
use sheguard_core::nav::Screen;

use crate::context::{AppContext, ShellSignals};
use crate::views::{LOAD_FAILED, LiveState, ScreenHeader, use_live_document};

#[component]
pub fn HistoryView() -> Element {
    let ShellSignals { session, .. } = use_context::<ShellSignals>();
    let uid = session.read().uid().cloned();

    rsx! {
        div { class: "page",
            ScreenHeader { title: Screen::History.title() }
            if let Some(uid) = uid {
                HistoryList { key: "{uid}", uid }
            } else {
                p { "Sign in to see the alerts you have sent." }
            }
        }
    }
}

#[component]
fn HistoryList(uid: UserId) -> Element {
    let ctx = use_context::<AppContext>();
    let mut error = use_signal(|| None::<String>);

    let history = ctx.sos_history();
    let feed_uid = uid.clone();
    let entries = use_live_document(move || {
        let history = history.clone();
        let uid = feed_uid.clone();
        async move { history.subscribe(&uid).await }
    });

    let history = ctx.sos_history();
    let remove = use_callback(move |entry: SosHistoryEntry| {
        let history = history.clone();
        let uid = uid.clone();
        spawn(async move {
            if let Err(err) = history.remove(&uid, &entry.id).await {
                tracing::warn!(error = %err, "failed to delete sos history entry");
                error.set(Some(err.to_string()));
            }
        });
    });

    let current = entries.read().clone();

    rsx! {
        match current {
            LiveState::Loading => rsx! {
                p { "Loading..." }
            },
            LiveState::Ready(items) => rsx! {
                HistoryItems { items, on_remove: remove }
            },
            LiveState::Failed => rsx! {
                p { "{LOAD_FAILED}" }
            },
        }
        if let Some(message) = error() {
            p { class: "form-error", "{message}" }
        }
    }
}

#[component]
fn HistoryItems(items: SosHistory, on_remove: Callback<SosHistoryEntry>) -> Element {
    if items.is_empty() {
        return rsx! {
            p { "No SOS history found." }
        };
    }
    rsx! {
        ul { class: "history-list",
            for entry in items.entries().iter().cloned() {
                HistoryRow { key: "{entry.id}", entry, on_remove }
            }
        }
    }
}

#[component]
fn HistoryRow(entry: SosHistoryEntry, on_remove: Callback<SosHistoryEntry>) -> Element {
    let sent_at = entry.timestamp.format("%Y-%m-%d %H:%M UTC").to_string();
    let recipients = match entry.recipients {
        1 => "Sent to 1 contact".to_string(),
        n => format!("Sent to {n} contacts"),
    };
    let target = entry.clone();
    rsx! {
        li { class: "history-row",
            div {
                p { class: "history-date", "{sent_at}" }
                p { class: "history-message", "{entry.message}" }
                p { class: "history-recipients", "{recipients}" }
            }
            button {
                class: "btn btn-danger",
                r#type: "button",
                onclick: move |_| on_remove.call(target.clone()),
                "Delete"
            }
        }
    }
}
