use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::api::{HttpApi, InMemoryApi, QuizApi};
use crate::auth::SessionStore;
use crate::config::ClientConfig;
use crate::error::AppServicesError;
use crate::profile_service::ProfileService;
use crate::quiz::QuizSessionController;
use crate::topic_service::TopicService;

/// Assembles app-facing services around one API client and one token store.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<SessionStore>,
    quiz: Arc<QuizSessionController>,
    topics: Arc<TopicService>,
    profile: Arc<ProfileService>,
}

impl AppServices {
    /// Build services talking to the HTTP API, with the token persisted in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: &ClientConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let api = Arc::new(HttpApi::new(config)?);
        tracing::info!(api = %api.base_url(), "using study API");
        Ok(Self::from_parts(api, storage, clock, config.question_count))
    }

    /// Fully offline services backed by the in-process fake server.
    #[must_use]
    pub fn demo(clock: Clock, question_count: u32) -> Self {
        Self::from_parts(
            Arc::new(InMemoryApi::demo()),
            Storage::in_memory(),
            clock,
            question_count,
        )
    }

    #[must_use]
    pub fn from_parts(
        api: Arc<dyn QuizApi>,
        storage: Storage,
        clock: Clock,
        question_count: u32,
    ) -> Self {
        let session = Arc::new(SessionStore::new(Arc::clone(&api), storage.tokens));
        let quiz = Arc::new(QuizSessionController::new(
            clock,
            Arc::clone(&api),
            question_count,
        ));
        let topics = Arc::new(TopicService::new(Arc::clone(&api)));
        let profile = Arc::new(ProfileService::new(api, Arc::clone(&session)));
        Self {
            session,
            quiz,
            topics,
            profile,
        }
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
