//! Client side of the study REST API.
//!
//! [`QuizApi`] has one method per endpoint. The bearer token is held by the
//! implementation and attached to every request once set, the same way a
//! browser client keeps a default `Authorization` header.

use async_trait::async_trait;
use std::fmt;

use quiz_core::model::{
    AnswerFeedback, AnswerSubmission, ProfileUpdate, Question, QuizHistoryEntry, QuizResult,
    SessionToken, Topic, TopicId, User,
};

use crate::error::ApiError;

mod dto;
mod http;
mod memory;

pub use http::HttpApi;
pub use memory::{Endpoint, InMemoryApi};

/// Account creation payload.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Set or remove the default bearer token for subsequent requests.
    fn set_bearer(&self, token: Option<SessionToken>);

    fn has_bearer(&self) -> bool;

    /// `POST /api/users/token`
    async fn issue_token(&self, email: &str, password: &str) -> Result<SessionToken, ApiError>;

    /// `GET /api/users/me`
    async fn current_user(&self) -> Result<User, ApiError>;

    /// `POST /api/users/register`
    async fn register(&self, account: &NewAccount) -> Result<User, ApiError>;

    /// `PUT /api/users/me`
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError>;

    /// `GET /api/topics`
    async fn list_topics(&self) -> Result<Vec<Topic>, ApiError>;

    /// `POST /api/quiz/session`
    async fn start_quiz(
        &self,
        topic_id: TopicId,
        question_count: u32,
    ) -> Result<Vec<Question>, ApiError>;

    /// `POST /api/quiz/answer`
    async fn submit_answer(&self, submission: &AnswerSubmission)
    -> Result<AnswerFeedback, ApiError>;

    /// `GET /api/quiz/results/{topic_id}`
    async fn quiz_results(&self, topic_id: TopicId) -> Result<QuizResult, ApiError>;

    /// `GET /api/quiz/history`
    async fn quiz_history(&self) -> Result<Vec<QuizHistoryEntry>, ApiError>;
}
