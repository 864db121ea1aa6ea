use dioxus::prelude::*;
use sheguard_core::model::{SosSettingsDraft, UserId};
use sheguard_core::nav::Screen;

use crate::context::{AppContext, ShellSignals};
use crate::views::ScreenHeader;

#[derive(Clone, Debug, PartialEq, Eq)]
enum SaveState {
    Idle,
    Saving,
    Saved,
    Failed(String),
}

const LINKS: [(&str, &str, Screen); 4] = [
    ("Account", "My Profile", Screen::Profile),
    ("General", "Manage Emergency Contacts", Screen::Contacts),
    ("Legal", "Privacy Policy", Screen::PrivacyPolicy),
    ("Legal", "About Us", Screen::AboutUs),
];

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let ShellSignals { mut shell, session, .. } = use_context::<ShellSignals>();

    let mut message = use_signal(String::new);
    let mut save_state = use_signal(|| SaveState::Idle);

    let registered = session
        .read()
        .registered_identity()
        .map(|identity| identity.uid().clone());

    let settings = ctx.sos_settings();
    let loaded = use_resource(move || {
        let settings = settings.clone();
        let uid = session
            .read()
            .registered_identity()
            .map(|identity| identity.uid().clone());
        async move {
            match uid {
                Some(uid) => Some(settings.load(&uid).await),
                None => None,
            }
        }
    });
    use_effect(move || {
        if let Some(Some(current)) = loaded.read().as_ref() {
            message.set(current.message().to_string());
        }
    });

    let settings = ctx.sos_settings();
    let save = use_callback(move |uid: UserId| {
        let settings = settings.clone();
        let draft = SosSettingsDraft::new(message());
        save_state.set(SaveState::Saving);
        spawn(async move {
            match settings.save(&uid, draft).await {
                Ok(saved) => {
                    message.set(saved.message().to_string());
                    save_state.set(SaveState::Saved);
                }
                Err(err) => save_state.set(SaveState::Failed(err.to_string())),
            }
        });
    });

    rsx! {
        div { class: "page",
            ScreenHeader { title: Screen::Settings.title() }
            for (section, label, screen) in LINKS {
                div { key: "{label}", class: "settings-item",
                    span { class: "settings-section", "{section}" }
                    button {
                        class: "settings-link",
                        r#type: "button",
                        onclick: move |_| shell.write().navigate_to(screen),
                        "{label}"
                    }
                }
            }
            h3 { class: "settings-section", "SOS Message" }
            if let Some(uid) = registered {
                textarea {
                    class: "text-input",
                    rows: "4",
                    value: "{message}",
                    oninput: move |evt| {
                        message.set(evt.value());
                        save_state.set(SaveState::Idle);
                    },
                }
                p { class: "sub-label", "Your location link will be added automatically at the end." }
                match save_state() {
                    SaveState::Saved => rsx! { p { class: "form-success", "Message saved." } },
                    SaveState::Failed(reason) => rsx! { p { class: "form-error", "{reason}" } },
                    SaveState::Idle | SaveState::Saving => rsx! {},
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: save_state() == SaveState::Saving,
                    onclick: move |_| save.call(uid.clone()),
                    if save_state() == SaveState::Saving { "Saving..." } else { "Save Message" }
                }
            } else {
                p { "Log in to customise your SOS message." }
            }
        }
    }
}
