use dioxus::prelude::*;
use dioxus_router::Router;

use crate::auth::{self, use_auth_provider};
use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let store = ctx.session_store();
    let auth = use_auth_provider(&store);

    use_hook(move || {
        if ctx.restore_on_launch() {
            spawn(auth::restore(store, auth));
        }
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "LLM Learning Bot" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
