use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::auth::use_auth;
use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn RegisterView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth();
    let navigator = use_navigator();

    let mut full_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let error = use_signal(|| None::<String>);
    let submitting = use_signal(|| false);

    let on_submit = use_callback(move |()| {
        let mut error = error;
        let mut submitting = submitting;
        if submitting() {
            return;
        }
        submitting.set(true);
        error.set(None);

        let store = ctx.session_store();
        let full_name = full_name.read().clone();
        let email = email.read().clone();
        let password = password.read().clone();
        // Outlives this view: navigating away must not cancel a half-done sign-in.
        spawn_forever(async move {
            let result = store.register(&email, &password, &full_name).await;
            auth.sync(&store);
            let Ok(mut busy) = submitting.try_write() else {
                return;
            };
            *busy = false;
            drop(busy);
            match result {
                Ok(_) => {
                    auth.clear_expired();
                    navigator.push(Route::Topics {});
                }
                Err(err) => {
                    if let Ok(mut slot) = error.try_write() {
                        *slot = Some(err.to_string());
                    }
                }
            }
        });
    });

    rsx! {
        div { class: "page auth",
            form {
                class: "auth-form",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    on_submit.call(());
                },
                h2 { "Create your account" }
                label { r#for: "register-name", "Full Name" }
                input {
                    id: "register-name",
                    value: "{full_name}",
                    oninput: move |evt| full_name.set(evt.value()),
                }
                label { r#for: "register-email", "Email address" }
                input {
                    id: "register-email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "register-password", "Password" }
                input {
                    id: "register-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "error", "{message}" }
                }
                button {
                    class: "button",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() { "Creating account..." } else { "Register" }
                }
                p { class: "alt",
                    "Already have an account? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
