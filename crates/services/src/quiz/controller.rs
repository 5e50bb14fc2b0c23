use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::model::{AnswerFeedback, AnswerSubmission, QuizResult, TopicId};

use crate::Clock;
use crate::api::QuizApi;
use crate::error::{ApiError, LoadError, QuizSessionError, SubmitError};
use crate::quiz::session::{Progress, QuizSession};

/// Result of [`QuizSessionController::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Moved to the question at this 1-based position.
    Next { position: usize },
    /// The session is complete. `result` is `None` if the aggregate could not be
    /// fetched yet; call [`QuizSessionController::fetch_results`] to retry.
    Completed { result: Option<QuizResult> },
}

/// Drives quiz sessions against the study API.
#[derive(Clone)]
pub struct QuizSessionController {
    clock: Clock,
    api: Arc<dyn QuizApi>,
    question_count: u32,
}

impl QuizSessionController {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn QuizApi>, question_count: u32) -> Self {
        Self {
            clock,
            api,
            question_count: question_count.max(1),
        }
    }

    /// Default number of questions requested per session.
    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Request a fresh batch of questions and start on the first one.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NoQuestions` if the topic has no questions or is unknown.
    /// Returns `LoadError::Unauthorized` if the session token was rejected.
    /// Returns `LoadError::Api` for transport or server failures.
    pub async fn start_session(
        &self,
        topic_id: TopicId,
        question_count: u32,
    ) -> Result<QuizSession, LoadError> {
        let questions = self
            .api
            .start_quiz(topic_id, question_count.max(1))
            .await
            .map_err(|err| match err {
                ApiError::NotFound => LoadError::NoQuestions,
                other => LoadError::from(other),
            })?;
        let session = QuizSession::new(topic_id, questions, self.clock.now())?;
        tracing::info!(
            topic_id = %topic_id,
            questions = session.total(),
            "quiz session started"
        );
        Ok(session)
    }

    /// Pick an answer for the current question and submit it.
    ///
    /// On a failed submission the question becomes selectable again.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Rejected` without a network call if the session state
    /// does not allow a selection. Returns `SubmitError::Api` or
    /// `SubmitError::Unauthorized` if the submission fails.
    pub async fn select_answer(
        &self,
        session: &mut QuizSession,
        option: &str,
    ) -> Result<AnswerFeedback, SubmitError> {
        let submission = self.prepare_answer(session, option)?;
        match self.submit(&submission).await {
            Ok(feedback) => {
                session.finish_answer(submission.question_id, feedback.clone());
                Ok(feedback)
            }
            Err(err) => {
                session.abandon_answer(submission.question_id);
                Err(err)
            }
        }
    }

    /// Pick `option` on the session using this controller's clock.
    ///
    /// # Errors
    ///
    /// Returns the session's `QuizSessionError` rejection.
    pub fn prepare_answer(
        &self,
        session: &mut QuizSession,
        option: &str,
    ) -> Result<AnswerSubmission, QuizSessionError> {
        session.begin_answer(option, self.clock.now())
    }

    /// Send a prepared submission. Used by callers that cannot hold the session
    /// across the request; pair with `QuizSession::finish_answer`/`abandon_answer`.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Unauthorized` or `SubmitError::Api` on failure.
    pub async fn submit(&self, submission: &AnswerSubmission) -> Result<AnswerFeedback, SubmitError> {
        let feedback = self.api.submit_answer(submission).await?;
        tracing::debug!(
            question_id = %submission.question_id,
            correct = feedback.is_correct,
            response_time = submission.response_time.as_secs(),
            "answer recorded"
        );
        Ok(feedback)
    }

    /// Move past the current question; on the last one, complete the session and
    /// fetch its aggregate.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Rejected` if the current question has no feedback yet
    /// or the session is already complete.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<AdvanceOutcome, SubmitError> {
        match self.step(session)? {
            Progress::Next { position } => Ok(AdvanceOutcome::Next { position }),
            Progress::Finished => {
                let result = match self.fetch_results(session).await {
                    Ok(result) => Some(result),
                    Err(err) => {
                        tracing::warn!(error = %err, "could not fetch quiz results");
                        None
                    }
                };
                Ok(AdvanceOutcome::Completed { result })
            }
        }
    }

    /// Move the pointer without fetching results.
    ///
    /// # Errors
    ///
    /// Returns the session's `QuizSessionError` rejection.
    pub fn step(&self, session: &mut QuizSession) -> Result<Progress, QuizSessionError> {
        let progress = session.advance(self.clock.now())?;
        if progress == Progress::Finished {
            tracing::info!(
                topic_id = %session.topic_id(),
                answered = session.answered_count(),
                "quiz session completed"
            );
        }
        Ok(progress)
    }

    /// Aggregate for a completed session. The first successful answer is cached
    /// on the session and returned without another request.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NotReady` if the session is still running, or the
    /// load errors of [`Self::load_results`].
    pub async fn fetch_results(&self, session: &mut QuizSession) -> Result<QuizResult, LoadError> {
        if !session.is_complete() {
            return Err(LoadError::NotReady);
        }
        if let Some(result) = session.result() {
            return Ok(result.clone());
        }
        let result = self.load_results(session.topic_id()).await?;
        Ok(session.record_result(result).clone())
    }

    /// `GET /api/quiz/results/{topic_id}` without touching any session.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Unauthorized` or `LoadError::Api` on failure.
    pub async fn load_results(&self, topic_id: TopicId) -> Result<QuizResult, LoadError> {
        Ok(self.api.quiz_results(topic_id).await?)
    }
}
