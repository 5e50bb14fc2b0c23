use std::sync::Arc;

use services::{ProfileService, QuizSessionController, SessionStore, TopicService};

/// Services the views need, supplied by the composition root (`crates/app`).
pub trait UiApp: Send + Sync {
    fn session_store(&self) -> Arc<SessionStore>;
    fn quiz(&self) -> Arc<QuizSessionController>;
    fn topics(&self) -> Arc<TopicService>;
    fn profile(&self) -> Arc<ProfileService>;

    /// Validate a persisted token when the window opens.
    fn restore_on_launch(&self) -> bool {
        true
    }
}

#[derive(Clone)]
pub struct AppContext {
    restore_on_launch: bool,
    session: Arc<SessionStore>,
    quiz: Arc<QuizSessionController>,
    topics: Arc<TopicService>,
    profile: Arc<ProfileService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            restore_on_launch: app.restore_on_launch(),
            session: app.session_store(),
            quiz: app.quiz(),
            topics: app.topics(),
            profile: app.profile(),
        }
    }

    #[must_use]
    pub fn restore_on_launch(&self) -> bool {
        self.restore_on_launch
    }

    #[must_use]
    pub fn session_store(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizSessionController> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn topics(&self) -> Arc<TopicService> {
        Arc::clone(&self.topics)
    }

    #[must_use]
    pub fn profile(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profile)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
