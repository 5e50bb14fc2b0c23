use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use services::AuthState;

use crate::auth::{self, use_auth};
use crate::context::AppContext;
use crate::views::{HomeView, LoginView, ProfileView, QuizView, RegisterView, TopicsView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/login", LoginView)] Login {},
        #[route("/register", RegisterView)] Register {},
        #[route("/topics", TopicsView)] Topics {},
        #[route("/quiz/:topic_id", QuizView)] Quiz { topic_id: u64 },
        #[route("/profile", ProfileView)] Profile {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Navbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
pub(crate) fn Navbar() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth();
    let navigator = use_navigator();

    let on_logout = use_callback(move |()| {
        let store = ctx.session_store();
        spawn(async move {
            auth::logout(store, auth).await;
            navigator.push(Route::Home {});
        });
    });

    rsx! {
        nav { class: "navbar",
            Link { class: "brand", to: Route::Home {}, "LLM Learning Bot" }
            ul { class: "nav-links",
                li { Link { to: Route::Home {}, "Home" } }
                li { Link { to: Route::Topics {}, "Topics" } }
            }
            div { class: "nav-auth",
                match auth.state() {
                    AuthState::Authenticated(user) => rsx! {
                        span { class: "nav-user", "Logged in as: {user.email}" }
                        Link { to: Route::Profile {}, "Profile" }
                        button {
                            class: "link-button",
                            onclick: move |_| on_logout.call(()),
                            "Logout"
                        }
                    },
                    AuthState::Validating => rsx! {
                        span { class: "nav-user", "Checking session..." }
                    },
                    AuthState::Unauthenticated | AuthState::Authenticating => rsx! {
                        Link { to: Route::Login {}, "Login" }
                        Link { to: Route::Register {}, "Register" }
                    },
                }
            }
        }
    }
}
