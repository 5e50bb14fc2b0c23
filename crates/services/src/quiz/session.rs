use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{
    AnswerFeedback, AnswerSubmission, Question, QuestionId, QuizResult, ResponseTime, TopicId,
};

use crate::error::{LoadError, QuizSessionError};

//
// ─── QUESTION PHASE ────────────────────────────────────────────────────────────
//

/// Per-question answer state. Reset to `Unanswered` whenever the pointer moves.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionPhase {
    Unanswered,
    /// An answer was picked and its submission is in flight.
    Submitting { selected: String },
    Answered {
        selected: String,
        feedback: AnswerFeedback,
    },
}

/// What happened when the pointer was moved past an answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Moved to the question at this 1-based position.
    Next { position: usize },
    /// The last question was answered; the session is now complete.
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One pass through a fixed batch of questions for a topic.
///
/// Pure state: every time-dependent method takes `now` from the caller's clock.
/// The question batch never changes after construction.
pub struct QuizSession {
    topic_id: TopicId,
    questions: Vec<Question>,
    current: usize,
    phase: QuestionPhase,
    shown_at: DateTime<Utc>,
    answered: usize,
    completed_at: Option<DateTime<Utc>>,
    result: Option<QuizResult>,
}

impl QuizSession {
    /// Start a session on the first question with its timer running.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NoQuestions` if the batch is empty.
    pub fn new(
        topic_id: TopicId,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, LoadError> {
        if questions.is_empty() {
            return Err(LoadError::NoQuestions);
        }
        Ok(Self {
            topic_id,
            questions,
            current: 0,
            phase: QuestionPhase::Unanswered,
            shown_at: started_at,
            answered: 0,
            completed_at: None,
            result: None,
        })
    }

    #[must_use]
    pub fn topic_id(&self) -> TopicId {
        self.topic_id
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// 1-based position of the current question.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current + 1
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position() == self.total()
    }

    #[must_use]
    pub fn phase(&self) -> &QuestionPhase {
        &self.phase
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match &self.phase {
            QuestionPhase::Unanswered => None,
            QuestionPhase::Submitting { selected } | QuestionPhase::Answered { selected, .. } => {
                Some(selected)
            }
        }
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        match &self.phase {
            QuestionPhase::Answered { feedback, .. } => Some(feedback),
            _ => None,
        }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answered
    }

    /// When the current question became current.
    #[must_use]
    pub fn shown_at(&self) -> DateTime<Utc> {
        self.shown_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Pick `option` for the current question and build its submission.
    ///
    /// The response time is measured from `shown_at` to `now`, floored to whole seconds.
    ///
    /// # Errors
    ///
    /// Returns a `QuizSessionError` if the session is complete, the question already
    /// has an answer in flight or recorded, or `option` is not offered.
    pub fn begin_answer(
        &mut self,
        option: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerSubmission, QuizSessionError> {
        if self.is_complete() {
            return Err(QuizSessionError::Completed);
        }
        match self.phase {
            QuestionPhase::Unanswered => {}
            QuestionPhase::Submitting { .. } => return Err(QuizSessionError::SubmissionPending),
            QuestionPhase::Answered { .. } => return Err(QuizSessionError::AlreadyAnswered),
        }
        let question = self
            .current_question()
            .ok_or(QuizSessionError::Completed)?;
        if !question.has_option(option) {
            return Err(QuizSessionError::UnknownOption(option.to_owned()));
        }

        let submission = AnswerSubmission {
            question_id: question.id(),
            selected_answer: option.to_owned(),
            response_time: ResponseTime::between(self.shown_at, now),
        };
        self.phase = QuestionPhase::Submitting {
            selected: option.to_owned(),
        };
        Ok(submission)
    }

    /// Record the server's verdict. Returns `false` and changes nothing when the
    /// verdict belongs to a question that is no longer current.
    pub fn finish_answer(&mut self, question_id: QuestionId, feedback: AnswerFeedback) -> bool {
        if !self.is_pending(question_id) {
            return false;
        }
        let selected = match std::mem::replace(&mut self.phase, QuestionPhase::Unanswered) {
            QuestionPhase::Submitting { selected } => selected,
            other => {
                self.phase = other;
                return false;
            }
        };
        self.phase = QuestionPhase::Answered { selected, feedback };
        self.answered += 1;
        true
    }

    /// Undo a failed submission so the question can be answered again.
    ///
    /// The timer keeps running from when the question was first shown.
    pub fn abandon_answer(&mut self, question_id: QuestionId) -> bool {
        if !self.is_pending(question_id) {
            return false;
        }
        self.phase = QuestionPhase::Unanswered;
        true
    }

    fn is_pending(&self, question_id: QuestionId) -> bool {
        !self.is_complete()
            && matches!(self.phase, QuestionPhase::Submitting { .. })
            && self.current_question().map(Question::id) == Some(question_id)
    }

    /// Move past the answered current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Unanswered` or `SubmissionPending` until the
    /// current question has feedback, and `Completed` once the session is over.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Progress, QuizSessionError> {
        if self.is_complete() {
            return Err(QuizSessionError::Completed);
        }
        match self.phase {
            QuestionPhase::Answered { .. } => {}
            QuestionPhase::Submitting { .. } => return Err(QuizSessionError::SubmissionPending),
            QuestionPhase::Unanswered => return Err(QuizSessionError::Unanswered),
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.phase = QuestionPhase::Unanswered;
            self.shown_at = now;
            Ok(Progress::Next {
                position: self.position(),
            })
        } else {
            self.completed_at = Some(now);
            Ok(Progress::Finished)
        }
    }

    /// Cache the server aggregate. Only the first result is kept.
    pub fn record_result(&mut self, result: QuizResult) -> &QuizResult {
        self.result.get_or_insert(result)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("topic_id", &self.topic_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("answered", &self.answered)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::Difficulty;
    use quiz_core::time::fixed_now;

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            TopicId::new(1),
            format!("Question {id}?"),
            vec!["A".into(), "B".into(), "C".into()],
            "A",
            "Because A.",
            Difficulty::new(2).unwrap(),
        )
        .unwrap()
    }

    fn session(len: u64) -> QuizSession {
        QuizSession::new(TopicId::new(1), (1..=len).map(question).collect(), fixed_now()).unwrap()
    }

    fn feedback(id: u64, is_correct: bool) -> AnswerFeedback {
        AnswerFeedback {
            question_id: QuestionId::new(id),
            is_correct,
            explanation: Some("Because A.".into()),
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        let err = QuizSession::new(TopicId::new(1), Vec::new(), fixed_now()).unwrap_err();
        assert!(matches!(err, LoadError::NoQuestions));
    }

    #[test]
    fn response_time_is_floored_from_when_question_was_shown() {
        let mut session = session(2);
        let submission = session
            .begin_answer("B", fixed_now() + Duration::milliseconds(4_999))
            .unwrap();
        assert_eq!(submission.question_id, QuestionId::new(1));
        assert_eq!(submission.selected_answer, "B");
        assert_eq!(submission.response_time.as_secs(), 4);
        assert_eq!(session.selected(), Some("B"));
    }

    #[test]
    fn second_selection_is_rejected_while_pending_and_after_answer() {
        let mut session = session(2);
        session.begin_answer("A", fixed_now()).unwrap();
        assert_eq!(
            session.begin_answer("B", fixed_now()),
            Err(QuizSessionError::SubmissionPending)
        );
        assert!(session.finish_answer(QuestionId::new(1), feedback(1, true)));
        assert_eq!(
            session.begin_answer("B", fixed_now()),
            Err(QuizSessionError::AlreadyAnswered)
        );
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut session = session(1);
        assert_eq!(
            session.begin_answer("Z", fixed_now()),
            Err(QuizSessionError::UnknownOption("Z".into()))
        );
        assert_eq!(session.phase(), &QuestionPhase::Unanswered);
    }

    #[test]
    fn abandoned_answer_can_be_retried_with_original_timer() {
        let mut session = session(1);
        session
            .begin_answer("B", fixed_now() + Duration::seconds(2))
            .unwrap();
        assert!(session.abandon_answer(QuestionId::new(1)));
        assert_eq!(session.phase(), &QuestionPhase::Unanswered);

        let retry = session
            .begin_answer("A", fixed_now() + Duration::seconds(7))
            .unwrap();
        assert_eq!(retry.response_time.as_secs(), 7);
    }

    #[test]
    fn stale_feedback_is_discarded() {
        let mut session = session(2);
        session.begin_answer("A", fixed_now()).unwrap();
        assert!(!session.finish_answer(QuestionId::new(2), feedback(2, true)));
        assert!(!session.abandon_answer(QuestionId::new(2)));
        assert!(matches!(session.phase(), QuestionPhase::Submitting { .. }));
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut session = session(2);
        assert_eq!(
            session.advance(fixed_now()),
            Err(QuizSessionError::Unanswered)
        );
        session.begin_answer("A", fixed_now()).unwrap();
        assert_eq!(
            session.advance(fixed_now()),
            Err(QuizSessionError::SubmissionPending)
        );
    }

    #[test]
    fn advancing_resets_question_state_and_timer() {
        let mut session = session(2);
        session.begin_answer("A", fixed_now()).unwrap();
        session.finish_answer(QuestionId::new(1), feedback(1, true));

        let later = fixed_now() + Duration::seconds(30);
        assert_eq!(session.advance(later), Ok(Progress::Next { position: 2 }));
        assert_eq!(session.position(), 2);
        assert!(session.is_last());
        assert_eq!(session.selected(), None);
        assert!(session.feedback().is_none());
        assert_eq!(session.shown_at(), later);

        let submission = session
            .begin_answer("C", later + Duration::seconds(3))
            .unwrap();
        assert_eq!(submission.response_time.as_secs(), 3);
    }

    #[test]
    fn last_answer_completes_the_session() {
        let mut session = session(1);
        session.begin_answer("B", fixed_now()).unwrap();
        session.finish_answer(QuestionId::new(1), feedback(1, false));
        assert_eq!(session.advance(fixed_now()), Ok(Progress::Finished));
        assert!(session.is_complete());
        assert_eq!(
            session.begin_answer("A", fixed_now()),
            Err(QuizSessionError::Completed)
        );
        assert_eq!(
            session.advance(fixed_now()),
            Err(QuizSessionError::Completed)
        );
    }

    #[test]
    fn first_recorded_result_wins() {
        let mut session = session(1);
        let first = QuizResult {
            topic_id: TopicId::new(1),
            total_questions: 1,
            correct_answers: 1,
            average_response_time: 2.0,
            completed_at: fixed_now(),
        };
        let second = QuizResult {
            correct_answers: 0,
            ..first.clone()
        };
        session.record_result(first.clone());
        session.record_result(second);
        assert_eq!(session.result(), Some(&first));
    }
}
