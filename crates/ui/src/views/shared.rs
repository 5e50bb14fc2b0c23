use dioxus::prelude::*;
use dioxus_router::Link;

use crate::auth::{self, use_auth};
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;

/// Shown on pages that need an account when nobody is signed in.
#[component]
pub fn SignInPrompt(message: &'static str) -> Element {
    let auth = use_auth();
    rsx! {
        div { class: "sign-in-prompt",
            h2 { "Please sign in" }
            if auth.session_expired() {
                p { class: "notice", "{ViewError::SessionExpired.message()}" }
            }
            p { "{message}" }
            Link { class: "button", to: Route::Login {}, "Sign In" }
        }
    }
}

/// Error state with a retry action. A rejected token ends the session instead.
#[component]
pub fn ErrorPanel(error: ViewError, on_retry: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth();

    use_hook(move || {
        if error == ViewError::SessionExpired {
            tracing::warn!("authenticated request rejected, ending session");
            spawn(auth::expire(ctx.session_store(), auth));
        }
    });

    rsx! {
        div { class: "error-panel",
            p { "{error.message()}" }
            if error == ViewError::SessionExpired {
                Link { class: "button", to: Route::Login {}, "Sign In" }
            } else {
                button { class: "button", onclick: move |_| on_retry.call(()), "Retry" }
            }
        }
    }
}
