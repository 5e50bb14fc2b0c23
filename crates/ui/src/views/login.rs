use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::auth::use_auth;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth();
    let navigator = use_navigator();

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
        let email = email.read().clone();
        let password = password.read().clone();
        // Outlives this view: navigating away must not cancel a half-done sign-in.
        spawn_forever(async move {
            let result = store.login(&email, &password).await;
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
                h2 { "Sign in to your account" }
                if auth.session_expired() {
                    p { class: "notice", "{ViewError::SessionExpired.message()}" }
                }
                label { r#for: "login-email", "Email address" }
                input {
                    id: "login-email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
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
                    if submitting() { "Signing in..." } else { "Sign in" }
                }
                p { class: "alt",
                    "Don't have an account? "
                    Link { to: Route::Register {}, "Register" }
                }
            }
        }
    }
}
