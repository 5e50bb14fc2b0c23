//! Self-contained stand-in for the study server.
//!
//! Used by tests and the offline `demo` command. It issues and checks bearer
//! tokens, grades answers against the stored correct option and aggregates
//! results and history per user like the real backend does.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use quiz_core::Clock;
use quiz_core::model::{
    AnswerFeedback, AnswerSubmission, Difficulty, ProfileUpdate, Question, QuestionId,
    QuizHistoryEntry, QuizResult, SessionToken, Topic, TopicId, User, UserId, validate_email,
};

use crate::api::{NewAccount, QuizApi};
use crate::error::ApiError;

const CORRECT_EXPLANATION: &str = "Your answer is correct!";

/// Endpoints of the study API, used to inspect traffic in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    IssueToken,
    CurrentUser,
    Register,
    UpdateProfile,
    ListTopics,
    StartQuiz,
    SubmitAnswer,
    QuizResults,
    QuizHistory,
}

struct Account {
    user: User,
    password: String,
}

struct RecordedAnswer {
    user_id: UserId,
    topic_id: TopicId,
    is_correct: bool,
    response_time: u32,
    answered_at: DateTime<Utc>,
}

#[derive(Default)]
struct ServerState {
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
    next_token: Option<String>,
    issued: u64,
    topics: Vec<Topic>,
    banks: HashMap<TopicId, Vec<Question>>,
    answers: Vec<RecordedAnswer>,
    calls: Vec<Endpoint>,
    offline: bool,
    bearer: Option<SessionToken>,
}

impl ServerState {
    fn user_for_bearer(&self) -> Result<&User, ApiError> {
        let token = self.bearer.as_ref().ok_or(ApiError::Unauthorized)?;
        let user_id = self
            .tokens
            .get(token.as_str())
            .ok_or(ApiError::Unauthorized)?;
        self.accounts
            .iter()
            .map(|account| &account.user)
            .find(|user| user.id == *user_id)
            .ok_or(ApiError::Unauthorized)
    }

    fn question(&self, id: QuestionId) -> Option<&Question> {
        self.banks.values().flatten().find(|q| q.id() == id)
    }

    fn aggregate<'a>(
        answers: impl Iterator<Item = &'a RecordedAnswer>,
    ) -> Option<(u32, u32, f64, DateTime<Utc>)> {
        let mut total = 0_u32;
        let mut correct = 0_u32;
        let mut time_sum = 0_u64;
        let mut last = None::<DateTime<Utc>>;
        for answer in answers {
            total = total.saturating_add(1);
            if answer.is_correct {
                correct = correct.saturating_add(1);
            }
            time_sum += u64::from(answer.response_time);
            last = Some(last.map_or(answer.answered_at, |at| at.max(answer.answered_at)));
        }
        #[allow(clippy::cast_precision_loss)]
        let average = time_sum as f64 / f64::from(total.max(1));
        last.map(|at| (total, correct, average, at))
    }
}

/// In-process fake of the study API.
pub struct InMemoryApi {
    clock: Clock,
    state: Mutex<ServerState>,
}

impl Default for InMemoryApi {
    fn default() -> Self {
        Self::new(Clock::system())
    }
}

impl InMemoryApi {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            state: Mutex::new(ServerState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, endpoint: Endpoint) -> Result<MutexGuard<'_, ServerState>, ApiError> {
        let mut state = self.lock();
        state.calls.push(endpoint);
        if state.offline {
            return Err(ApiError::Unavailable("study API is offline".into()));
        }
        Ok(state)
    }

    /// Registers an account directly, bypassing the API.
    #[must_use]
    pub fn with_user(self, email: &str, password: &str, full_name: &str) -> Self {
        {
            let mut state = self.lock();
            let id = UserId::new(state.accounts.len() as u64 + 1);
            state.accounts.push(Account {
                user: User {
                    id,
                    email: email.to_owned(),
                    full_name: full_name.to_owned(),
                    is_active: true,
                },
                password: password.to_owned(),
            });
        }
        self
    }

    /// Adds a topic with its question bank. Sessions hand out questions in bank order.
    #[must_use]
    pub fn with_topic(self, topic: Topic, questions: Vec<Question>) -> Self {
        {
            let mut state = self.lock();
            state.banks.insert(topic.id, questions);
            state.topics.push(topic);
        }
        self
    }

    /// Makes the next issued token use this exact value.
    #[must_use]
    pub fn with_next_token(self, token: &str) -> Self {
        self.lock().next_token = Some(token.to_owned());
        self
    }

    /// Pre-registers a valid token for an existing account, as if issued earlier.
    #[must_use]
    pub fn with_issued_token(self, token: &str, email: &str) -> Self {
        {
            let mut state = self.lock();
            let user_id = state
                .accounts
                .iter()
                .find(|account| account.user.email == email)
                .map(|account| account.user.id);
            if let Some(user_id) = user_id {
                state.tokens.insert(token.to_owned(), user_id);
            }
        }
        self
    }

    /// Simulates a network outage (`true`) or recovery (`false`).
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Invalidates every issued token, as an expiry on the server would.
    pub fn revoke_tokens(&self) {
        self.lock().tokens.clear();
    }

    #[must_use]
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.lock().calls.iter().filter(|c| **c == endpoint).count()
    }

    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }

    /// Five starter topics with a short question bank each, plus the
    /// `demo@example.com` / `demo` account.
    #[must_use]
    pub fn demo() -> Self {
        Self::demo_with_clock(Clock::system())
    }

    #[must_use]
    pub fn demo_with_clock(clock: Clock) -> Self {
        let api = Self::new(clock).with_user("demo@example.com", "demo", "Demo User");
        demo_topics()
            .into_iter()
            .fold(api, |api, (topic, questions)| api.with_topic(topic, questions))
    }
}

#[async_trait]
impl QuizApi for InMemoryApi {
    fn set_bearer(&self, token: Option<SessionToken>) {
        self.lock().bearer = token;
    }

    fn has_bearer(&self) -> bool {
        self.lock().bearer.is_some()
    }

    async fn issue_token(&self, email: &str, password: &str) -> Result<SessionToken, ApiError> {
        let mut state = self.record(Endpoint::IssueToken)?;
        let user_id = state
            .accounts
            .iter()
            .find(|account| account.user.email == email && account.password == password)
            .map(|account| account.user.id)
            .ok_or(ApiError::Unauthorized)?;
        state.issued += 1;
        let raw = state
            .next_token
            .take()
            .unwrap_or_else(|| format!("token-{}-{}", user_id, state.issued));
        state.tokens.insert(raw.clone(), user_id);
        SessionToken::new(raw).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let state = self.record(Endpoint::CurrentUser)?;
        state.user_for_bearer().cloned()
    }

    async fn register(&self, account: &NewAccount) -> Result<User, ApiError> {
        let mut state = self.record(Endpoint::Register)?;
        let email = validate_email(&account.email)
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        if state.accounts.iter().any(|a| a.user.email == email) {
            return Err(ApiError::BadRequest("Email already registered".into()));
        }
        let user = User {
            id: UserId::new(state.accounts.len() as u64 + 1),
            email,
            full_name: account.full_name.clone(),
            is_active: true,
        };
        state.accounts.push(Account {
            user: user.clone(),
            password: account.password.clone(),
        });
        Ok(user)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let mut state = self.record(Endpoint::UpdateProfile)?;
        let user_id = state.user_for_bearer()?.id;
        if state
            .accounts
            .iter()
            .any(|a| a.user.email == update.email && a.user.id != user_id)
        {
            return Err(ApiError::BadRequest("Email already registered".into()));
        }
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.user.id == user_id)
            .ok_or(ApiError::Unauthorized)?;
        account.user.email.clone_from(&update.email);
        account.user.full_name.clone_from(&update.full_name);
        if let Some(password) = &update.password {
            account.password.clone_from(password);
        }
        Ok(account.user.clone())
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, ApiError> {
        let state = self.record(Endpoint::ListTopics)?;
        Ok(state.topics.clone())
    }

    async fn start_quiz(
        &self,
        topic_id: TopicId,
        question_count: u32,
    ) -> Result<Vec<Question>, ApiError> {
        let state = self.record(Endpoint::StartQuiz)?;
        state.user_for_bearer()?;
        let bank = state.banks.get(&topic_id).ok_or(ApiError::NotFound)?;
        let take = usize::try_from(question_count).unwrap_or(usize::MAX);
        Ok(bank.iter().take(take).cloned().collect())
    }

    async fn submit_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<AnswerFeedback, ApiError> {
        let mut state = self.record(Endpoint::SubmitAnswer)?;
        let user_id = state.user_for_bearer()?.id;
        let question = state
            .question(submission.question_id)
            .ok_or(ApiError::NotFound)?;
        let is_correct = question.is_correct(&submission.selected_answer);
        let explanation = if is_correct {
            CORRECT_EXPLANATION.to_owned()
        } else {
            question.explanation().to_owned()
        };
        let topic_id = question.topic_id();
        let answered_at = self.clock.now();
        state.answers.push(RecordedAnswer {
            user_id,
            topic_id,
            is_correct,
            response_time: submission.response_time.as_secs(),
            answered_at,
        });
        Ok(AnswerFeedback {
            question_id: submission.question_id,
            is_correct,
            explanation: Some(explanation),
        })
    }

    async fn quiz_results(&self, topic_id: TopicId) -> Result<QuizResult, ApiError> {
        let state = self.record(Endpoint::QuizResults)?;
        let user_id = state.user_for_bearer()?.id;
        let answers = state
            .answers
            .iter()
            .filter(|a| a.user_id == user_id && a.topic_id == topic_id);
        let (total, correct, average, completed_at) =
            ServerState::aggregate(answers).ok_or(ApiError::NotFound)?;
        Ok(QuizResult {
            topic_id,
            total_questions: total,
            correct_answers: correct,
            average_response_time: average,
            completed_at,
        })
    }

    async fn quiz_history(&self) -> Result<Vec<QuizHistoryEntry>, ApiError> {
        let state = self.record(Endpoint::QuizHistory)?;
        let user_id = state.user_for_bearer()?.id;
        let mut by_topic: BTreeMap<TopicId, Vec<&RecordedAnswer>> = BTreeMap::new();
        for answer in state.answers.iter().filter(|a| a.user_id == user_id) {
            by_topic.entry(answer.topic_id).or_default().push(answer);
        }
        let entries = by_topic
            .into_iter()
            .filter_map(|(topic_id, answers)| {
                let (total, correct, average, completed_at) =
                    ServerState::aggregate(answers.into_iter())?;
                let topic_name = state
                    .topics
                    .iter()
                    .find(|t| t.id == topic_id)
                    .map_or_else(|| format!("Topic {topic_id}"), |t| t.name.clone());
                Some(QuizHistoryEntry {
                    topic_id,
                    topic_name,
                    total_questions: total,
                    correct_answers: correct,
                    average_response_time: average,
                    completed_at,
                })
            })
            .collect();
        Ok(entries)
    }
}

fn demo_topics() -> Vec<(Topic, Vec<Question>)> {
    let specs: [(&str, &str, i64, &[(&str, [&str; 4], &str)]); 5] = [
        (
            "RAG Systems",
            "Learn about Retrieval Augmented Generation and how it enhances LLM capabilities.",
            3,
            &[
                (
                    "What does RAG stand for?",
                    [
                        "Retrieval Augmented Generation",
                        "Recursive Attention Graph",
                        "Random Access Generation",
                        "Ranked Answer Grouping",
                    ],
                    "RAG combines a retriever with a generator so answers are grounded in fetched documents.",
                ),
                (
                    "Which component finds the passages a RAG pipeline feeds to the model?",
                    ["The retriever", "The tokenizer", "The optimizer", "The decoder head"],
                    "The retriever searches an index for passages relevant to the query.",
                ),
            ],
        ),
        (
            "Vector Databases",
            "Understand vector databases and their role in modern AI applications.",
            4,
            &[(
                "What do vector databases index?",
                ["Embeddings", "Stack traces", "Raw HTML", "Audio codecs"],
                "They store embeddings and answer nearest-neighbour queries over them.",
            )],
        ),
        (
            "LLM Validation",
            "Master techniques for validating and evaluating LLM performance.",
            3,
            &[(
                "What is a held-out evaluation set used for?",
                [
                    "Measuring quality on data the model was not tuned on",
                    "Speeding up inference",
                    "Compressing weights",
                    "Tokenizing prompts",
                ],
                "Held-out data estimates how the model behaves on unseen inputs.",
            )],
        ),
        (
            "LLM Fine-tuning",
            "Learn how to fine-tune LLMs for specific tasks and domains.",
            5,
            &[(
                "What does LoRA train during fine-tuning?",
                [
                    "Low-rank adapter matrices",
                    "The full embedding table only",
                    "The tokenizer vocabulary",
                    "Nothing, it is a prompt format",
                ],
                "LoRA freezes base weights and learns small low-rank updates.",
            )],
        ),
        (
            "LLM Orchestration",
            "Explore methods for orchestrating multiple LLMs in complex applications.",
            4,
            &[(
                "What does an orchestration layer typically decide?",
                [
                    "Which model or tool handles each step",
                    "The GPU clock speed",
                    "The model's vocabulary size",
                    "The training learning rate",
                ],
                "Orchestrators route steps between models, tools and memory.",
            )],
        ),
    ];

    let mut next_question = 1_u64;
    specs
        .iter()
        .zip(1_u64..)
        .filter_map(|((name, description, level, bank), id)| {
            let difficulty = Difficulty::new(*level).ok()?;
            let topic_id = TopicId::new(id);
            let questions = bank
                .iter()
                .filter_map(|(text, options, explanation)| {
                    let question_id = QuestionId::new(next_question);
                    next_question += 1;
                    // The first listed option is the answer; rotate so it moves around.
                    let mut shuffled: Vec<String> =
                        options.iter().map(|o| (*o).to_owned()).collect();
                    let shift = usize::try_from(question_id.value() % 4).unwrap_or(0);
                    shuffled.rotate_right(shift);
                    Question::new(
                        question_id,
                        topic_id,
                        *text,
                        shuffled,
                        options[0],
                        *explanation,
                        difficulty,
                    )
                    .ok()
                })
                .collect();
            let topic = Topic {
                id: topic_id,
                name: (*name).to_owned(),
                description: (*description).to_owned(),
                difficulty,
            };
            Some((topic, questions))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::ResponseTime;
    use quiz_core::time::fixed_clock;

    fn api() -> InMemoryApi {
        InMemoryApi::new(fixed_clock()).with_user("test@example.com", "password", "Test User")
    }

    #[tokio::test]
    async fn token_grants_access_to_identity() {
        let api = api().with_next_token("test_token");
        let token = api.issue_token("test@example.com", "password").await.unwrap();
        assert_eq!(token.as_str(), "test_token");

        assert!(matches!(api.current_user().await, Err(ApiError::Unauthorized)));
        api.set_bearer(Some(token));
        let user = api.current_user().await.unwrap();
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.id, UserId::new(1));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let api = api();
        let err = api.issue_token("test@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let api = api();
        let account = NewAccount {
            email: "test@example.com".into(),
            password: "pw".into(),
            full_name: "Again".into(),
        };
        let err = api.register(&account).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref d) if d.contains("already")));
    }

    #[tokio::test]
    async fn results_aggregate_recorded_answers() {
        let api = InMemoryApi::demo().with_next_token("t");
        let token = api.issue_token("demo@example.com", "demo").await.unwrap();
        api.set_bearer(Some(token));

        let questions = api.start_quiz(TopicId::new(1), 10).await.unwrap();
        assert_eq!(questions.len(), 2);

        for (question, secs) in questions.iter().zip([2_u32, 4]) {
            let feedback = api
                .submit_answer(&AnswerSubmission {
                    question_id: question.id(),
                    selected_answer: question.correct_answer().to_owned(),
                    response_time: ResponseTime::from_secs(secs),
                })
                .await
                .unwrap();
            assert!(feedback.is_correct);
        }

        let result = api.quiz_results(TopicId::new(1)).await.unwrap();
        assert_eq!(result.total_questions, 2);
        assert_eq!(result.correct_answers, 2);
        assert!((result.average_response_time - 3.0).abs() < f64::EPSILON);

        let history = api.quiz_history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].topic_name, "RAG Systems");
    }

    #[test]
    fn demo_answers_are_not_always_first() {
        let positions: Vec<usize> = demo_topics()
            .iter()
            .flat_map(|(_, questions)| questions.iter())
            .map(|q| {
                q.options()
                    .iter()
                    .position(|o| q.is_correct(o))
                    .expect("correct answer is offered")
            })
            .collect();
        assert_eq!(positions.len(), 6);
        assert!(positions.iter().any(|p| *p != 0));
        assert_eq!(positions[0], 1);
    }

    #[tokio::test]
    async fn offline_mode_fails_every_call_but_records_it() {
        let api = api();
        api.set_offline(true);
        assert!(matches!(api.list_topics().await, Err(ApiError::Unavailable(_))));
        assert_eq!(api.call_count(Endpoint::ListTopics), 1);
        api.set_offline(false);
        assert!(api.list_topics().await.unwrap().is_empty());
    }
}
