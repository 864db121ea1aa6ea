use dioxus::prelude::*;
use services::IdentityProvider;

use crate::context::AppContext;

/// Email login / sign-up form. `on_success` fires after the provider accepted
/// the credentials.
#[component]
pub fn AuthForm(on_success: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let provider = ctx.auth().provider();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut is_login = use_signal(|| true);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let available = provider.is_some();
    let submit = move |_| {
        let Some(provider) = provider.clone() else {
            return;
        };
        let email_value = email();
        let password_value = password();
        let login = is_login();
        busy.set(true);
        error.set(None);
        spawn(async move {
            let result = if login {
                provider
                    .sign_in_with_email(&email_value, &password_value)
                    .await
            } else {
                provider.create_account(&email_value, &password_value).await
            };
            busy.set(false);
            match result {
                Ok(identity) => {
                    tracing::info!(uid = %identity.uid(), "authenticated");
                    password.set(String::new());
                    on_success.call(());
                }
                Err(err) => error.set(Some(err.to_string())),
            }
        });
    };

    let title = if is_login() { "Login" } else { "Create an Account" };
    let action = if is_login() { "Login" } else { "Sign Up" };
    let toggle = if is_login() {
        "Don't have an account? Sign Up"
    } else {
        "Already have an account? Login"
    };

    rsx! {
        div { class: "auth-form",
            h2 { "{title}" }
            p { class: "auth-subtitle",
                "Create an account to save your contacts and SOS history securely."
            }
            if available {
                input {
                    class: "auth-input",
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                input {
                    class: "auth-input",
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "auth-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy(),
                    onclick: submit,
                    if busy() { "Please wait..." } else { "{action}" }
                }
                button {
                    class: "btn-link",
                    r#type: "button",
                    onclick: move |_| {
                        is_login.set(!is_login());
                        error.set(None);
                    },
                    "{toggle}"
                }
            } else {
                p { class: "auth-error", "Sign-in is not available in this build." }
            }
        }
    }
}
