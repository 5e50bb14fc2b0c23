use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::model::ids::{QuestionId, TopicId};

//
// ─── RESPONSE TIME ─────────────────────────────────────────────────────────────
//

/// Whole seconds between a question becoming current and the answer being picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ResponseTime(u32);

impl ResponseTime {
    #[must_use]
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    /// Floors an elapsed duration to whole seconds. Negative durations count as zero.
    #[must_use]
    pub fn from_elapsed(elapsed: Duration) -> Self {
        let millis = elapsed.num_milliseconds().max(0);
        Self(u32::try_from(millis / 1000).unwrap_or(u32::MAX))
    }

    /// Measures from `shown_at` to `answered_at`.
    #[must_use]
    pub fn between(shown_at: DateTime<Utc>, answered_at: DateTime<Utc>) -> Self {
        Self::from_elapsed(answered_at - shown_at)
    }

    #[must_use]
    pub const fn as_secs(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResponseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

//
// ─── SUBMISSION / FEEDBACK ─────────────────────────────────────────────────────
//

/// Payload sent once per question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub selected_answer: String,
    pub response_time: ResponseTime,
}

/// Server verdict for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Aggregate computed server-side for a completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub topic_id: TopicId,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub average_response_time: f64,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// Rounded percentage of correct answers; zero for an empty result.
    #[must_use]
    pub fn score_percent(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        let correct = u64::from(self.correct_answers.min(self.total_questions));
        let total = u64::from(self.total_questions);
        u32::try_from((correct * 200 + total) / (total * 2)).unwrap_or(100)
    }
}

/// One row of the profile's quiz history.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizHistoryEntry {
    pub topic_id: TopicId,
    pub topic_name: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub average_response_time: f64,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn response_time_is_floored() {
        assert_eq!(ResponseTime::from_elapsed(Duration::milliseconds(999)).as_secs(), 0);
        assert_eq!(ResponseTime::from_elapsed(Duration::milliseconds(1_000)).as_secs(), 1);
        assert_eq!(ResponseTime::from_elapsed(Duration::milliseconds(2_999)).as_secs(), 2);
        assert_eq!(ResponseTime::from_elapsed(Duration::milliseconds(-50)).as_secs(), 0);
    }

    #[test]
    fn response_time_between_instants() {
        let shown = fixed_now();
        let answered = shown + Duration::milliseconds(4_750);
        assert_eq!(ResponseTime::between(shown, answered), ResponseTime::from_secs(4));
        assert_eq!(ResponseTime::from_secs(4).to_string(), "4s");
    }

    #[test]
    fn score_percent_rounds() {
        let result = |correct, total| QuizResult {
            topic_id: TopicId::new(1),
            total_questions: total,
            correct_answers: correct,
            average_response_time: 1.5,
            completed_at: fixed_now(),
        };
        assert_eq!(result(2, 3).score_percent(), 67);
        assert_eq!(result(0, 0).score_percent(), 0);
        assert_eq!(result(4, 4).score_percent(), 100);
        assert_eq!(result(1, 8).score_percent(), 13);
    }
}
