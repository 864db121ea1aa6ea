use dioxus::prelude::*;
use sheguard_core::model::{
    ContactList, EmergencyContact, EmergencyContactDraft, MAX_EMERGENCY_CONTACTS, Session, UserId,
};
use sheguard_core::nav::Screen;

use crate::context::{AppContext, ShellSignals};
use crate::views::{LOAD_FAILED, LiveState, ScreenHeader, use_live_document};

#[component]
pub fn ContactsView() -> Element {
    let ShellSignals {
        mut shell, session, ..
    } = use_context::<ShellSignals>();
    let uid = registered_uid(&session.read());

    rsx! {
        div { class: "page",
            ScreenHeader { title: Screen::Contacts.title() }
            if let Some(uid) = uid {
                p { class: "form-label",
                    "Add up to {MAX_EMERGENCY_CONTACTS} contacts. These people will be alerted in an emergency."
                }
                ContactEditor { key: "{uid}", uid }
            } else {
                p { "Log in to save emergency contacts." }
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

pub(crate) fn registered_uid(session: &Session) -> Option<UserId> {
    session.registered_identity().map(|identity| identity.uid().clone())
}

/// Contact list bound to one user's live document.
#[component]
fn ContactEditor(uid: UserId) -> Element {
    let ctx = use_context::<AppContext>();
    let mut name = use_signal(String::new);
    let mut phone = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let contacts = ctx.contacts();
    let feed_uid = uid.clone();
    let list = use_live_document(move || {
        let contacts = contacts.clone();
        let uid = feed_uid.clone();
        async move { contacts.subscribe(&uid).await }
    });

    let contacts = ctx.contacts();
    let add_uid = uid.clone();
    let add = move |_| {
        let contacts = contacts.clone();
        let uid = add_uid.clone();
        let draft = EmergencyContactDraft::new(name(), phone());
        spawn(async move {
            match contacts.add(&uid, draft).await {
                Ok(_) => {
                    name.set(String::new());
                    phone.set(String::new());
                    error.set(None);
                }
                Err(err) => error.set(Some(err.to_string())),
            }
        });
    };

    let contacts = ctx.contacts();
    let remove = use_callback(move |contact: EmergencyContact| {
        let contacts = contacts.clone();
        let uid = uid.clone();
        spawn(async move {
            if let Err(err) = contacts.remove(&uid, &contact.id).await {
                error.set(Some(err.to_string()));
            }
        });
    });

    let current = list.read().clone();
    let full = matches!(&current, LiveState::Ready(items) if items.is_full());

    rsx! {
        match current {
            LiveState::Loading => rsx! {
                p { "Loading..." }
            },
            LiveState::Ready(items) => rsx! {
                ContactItems { items, on_remove: remove }
            },
            LiveState::Failed => rsx! {
                p { "{LOAD_FAILED}" }
            },
        }
        div { class: "contact-form",
            input {
                class: "text-input",
                placeholder: "Name",
                value: "{name}",
                oninput: move |evt| name.set(evt.value()),
            }
            input {
                class: "text-input",
                r#type: "tel",
                placeholder: "Phone number",
                value: "{phone}",
                oninput: move |evt| phone.set(evt.value()),
            }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: full,
                onclick: add,
                "Add Contact"
            }
        }
    }
}

#[component]
fn ContactItems(items: ContactList, on_remove: Callback<EmergencyContact>) -> Element {
    if items.is_empty() {
        return rsx! {
            p { "No emergency contacts yet." }
        };
    }
    rsx! {
        ul { class: "contact-list",
            for contact in items.contacts().iter().cloned() {
                ContactRow { key: "{contact.id}", contact, on_remove }
            }
        }
    }
}

#[component]
fn ContactRow(contact: EmergencyContact, on_remove: Callback<EmergencyContact>) -> Element {
    let target = contact.clone();
    rsx! {
        li { class: "contact-row",
            div {
                p { class: "contact-name", "{contact.name}" }
                p { class: "contact-phone", "{contact.phone}" }
            }
            button {
                class: "btn btn-danger",
                r#type: "button",
                onclick: move |_| on_remove.call(target.clone()),
                "Remove"
            }
        }
    }
}
