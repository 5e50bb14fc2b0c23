use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use quiz_core::model::{
    AnswerFeedback, AnswerSubmission, ProfileUpdate, Question, QuizHistoryEntry, QuizResult,
    SessionToken, Topic, TopicId, User,
};

use crate::api::dto::{
    AnswerRequest, AnswerResponse, ErrorBody, HistoryEntryDto, ProfileUpdateRequest,
    QuestionDto, QuizResultDto, RegisterRequest, StartQuizRequest, TokenResponse, TopicDto,
};
use crate::api::{NewAccount, QuizApi};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// `reqwest`-backed client for the study API.
pub struct HttpApi {
    client: Client,
    base_url: String,
    bearer: RwLock<Option<SessionToken>>,
}

impl HttpApi {
    /// Build a client with the configured base URL and request timeout.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` builder error if the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, &config.api_base_url))
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            bearer: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let guard = self.bearer.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.header(AUTHORIZATION, token.bearer_header()),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "api request");
        let response = self.authorized(builder).send().await?;
        let response = check_status(path, response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

async fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::debug!(path, status = status.as_u16(), "api request failed");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let body = response.bytes().await.unwrap_or_default();
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .map(|body| body.message())
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            Err(ApiError::BadRequest(detail))
        }
        other => Err(ApiError::Status(other.as_u16())),
    }
}

#[async_trait]
impl QuizApi for HttpApi {
    fn set_bearer(&self, token: Option<SessionToken>) {
        let mut guard = self.bearer.write().unwrap_or_else(PoisonError::into_inner);
        *guard = token;
    }

    fn has_bearer(&self) -> bool {
        self.bearer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    async fn issue_token(&self, email: &str, password: &str) -> Result<SessionToken, ApiError> {
        let path = "/api/users/token";
        let request = self
            .client
            .post(self.url(path))
            .form(&[("username", email), ("password", password)]);
        let response: TokenResponse = self.send(path, request).await?;
        response.into_token()
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let path = "/api/users/me";
        self.send(path, self.client.get(self.url(path))).await
    }

    async fn register(&self, account: &NewAccount) -> Result<User, ApiError> {
        let path = "/api/users/register";
        let request = self
            .client
            .post(self.url(path))
            .json(&RegisterRequest::from(account));
        self.send(path, request).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let path = "/api/users/me";
        let request = self
            .client
            .put(self.url(path))
            .json(&ProfileUpdateRequest::from(update));
        self.send(path, request).await
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, ApiError> {
        let path = "/api/topics";
        let topics: Vec<TopicDto> = self.send(path, self.client.get(self.url(path))).await?;
        topics.into_iter().map(TopicDto::into_topic).collect()
    }

    async fn start_quiz(
        &self,
        topic_id: TopicId,
        question_count: u32,
    ) -> Result<Vec<Question>, ApiError> {
        let path = "/api/quiz/session";
        let request = self.client.post(self.url(path)).json(&StartQuizRequest {
            topic_id,
            number_of_questions: question_count,
        });
        let questions: Vec<QuestionDto> = self.send(path, request).await?;
        questions
            .into_iter()
            .map(|dto| dto.into_question(topic_id))
            .collect()
    }

    async fn submit_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<AnswerFeedback, ApiError> {
        let path = "/api/quiz/answer";
        let request = self
            .client
            .post(self.url(path))
            .json(&AnswerRequest::from(submission));
        let response: AnswerResponse = self.send(path, request).await?;
        Ok(response.into_feedback(submission.question_id))
    }

    async fn quiz_results(&self, topic_id: TopicId) -> Result<QuizResult, ApiError> {
        let path = format!("/api/quiz/results/{topic_id}");
        let result: QuizResultDto = self.send(&path, self.client.get(self.url(&path))).await?;
        result.into_result()
    }

    async fn quiz_history(&self) -> Result<Vec<QuizHistoryEntry>, ApiError> {
        let path = "/api/quiz/history";
        let entries: Vec<HistoryEntryDto> =
            self.send(path, self.client.get(self.url(path))).await?;
        entries.into_iter().map(HistoryEntryDto::into_entry).collect()
    }
}
