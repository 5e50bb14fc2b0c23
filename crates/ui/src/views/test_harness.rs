use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::time::fixed_clock;
use services::{
    AppServices, InMemoryApi, ProfileService, QuizSessionController, SessionStore, TopicService,
};
use storage::repository::Storage;

use crate::auth::use_auth_provider;
use crate::context::{UiApp, build_app_context};
use crate::routes::Navbar;
use crate::views::{HomeView, LoginView, ProfileView, QuizView, TopicsView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn session_store(&self) -> Arc<SessionStore> {
        self.services.session_store()
    }

    fn quiz(&self) -> Arc<QuizSessionController> {
        self.services.quiz()
    }

    fn topics(&self) -> Arc<TopicService> {
        self.services.topics()
    }

    fn profile(&self) -> Arc<ProfileService> {
        self.services.profile()
    }

    fn restore_on_launch(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Navbar,
    Home,
    Login,
    Topics,
    Quiz(u64),
    Profile,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let ctx = use_context_provider(|| build_app_context(&app));
    use_auth_provider(&ctx.session_store());
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Navbar => rsx! { Navbar {} },
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Topics => rsx! { TopicsView {} },
        ViewKind::Quiz(topic_id) => rsx! { QuizView { topic_id } },
        ViewKind::Profile => rsx! { ProfileView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub api: Arc<InMemoryApi>,
    pub services: AppServices,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let spawned tasks and resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..5 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Demo catalogue behind the in-memory API, optionally signed in as the demo user.
pub async fn setup_view_harness(view: ViewKind, signed_in: bool) -> ViewHarness {
    let api = Arc::new(InMemoryApi::demo_with_clock(fixed_clock()));
    setup_view_harness_with_api(view, signed_in, api).await
}

pub async fn setup_view_harness_with_api(
    view: ViewKind,
    signed_in: bool,
    api: Arc<InMemoryApi>,
) -> ViewHarness {
    let services = AppServices::from_parts(api.clone(), Storage::in_memory(), fixed_clock(), 10);
    if signed_in {
        services
            .session_store()
            .login("demo@example.com", "demo")
            .await
            .expect("demo login");
    }

    let app = Arc::new(TestApp {
        services: services.clone(),
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, api, services }
}
