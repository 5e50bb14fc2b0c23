use thiserror::Error;

use crate::model::ids::{QuestionId, TopicId};
use crate::model::topic::Difficulty;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,
    #[error("question {0} has no options")]
    NoOptions(QuestionId),
}

/// One multiple-choice question of a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    topic_id: TopicId,
    text: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
    difficulty: Difficulty,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank or there are no options.
    pub fn new(
        id: QuestionId,
        topic_id: TopicId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions(id));
        }
        Ok(Self {
            id,
            topic_id,
            text,
            options,
            correct_answer: correct_answer.into(),
            explanation: explanation.into(),
            difficulty,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn topic_id(&self) -> TopicId {
        self.topic_id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Local correctness check used for highlighting; grading itself happens server-side.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }
}
