//! Wire shapes of the study API and their conversion into domain types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    AnswerFeedback, AnswerSubmission, Difficulty, ProfileUpdate, Question, QuestionId,
    QuizHistoryEntry, QuizResult, SessionToken, Topic, TopicId,
};

use crate::api::NewAccount;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

impl TokenResponse {
    pub(crate) fn into_token(self) -> Result<SessionToken, ApiError> {
        SessionToken::new(self.access_token).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
}

impl<'a> From<&'a NewAccount> for RegisterRequest<'a> {
    fn from(account: &'a NewAccount) -> Self {
        Self {
            email: &account.email,
            password: &account.password,
            full_name: &account.full_name,
        }
    }
}

/// The server expects a password field on every update; empty means "unchanged".
#[derive(Debug, Serialize)]
pub(crate) struct ProfileUpdateRequest<'a> {
    pub email: &'a str,
    pub full_name: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a ProfileUpdate> for ProfileUpdateRequest<'a> {
    fn from(update: &'a ProfileUpdate) -> Self {
        Self {
            email: &update.email,
            full_name: &update.full_name,
            password: update.password.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicDto {
    pub id: TopicId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty_level: i64,
}

impl TopicDto {
    pub(crate) fn into_topic(self) -> Result<Topic, ApiError> {
        let difficulty = Difficulty::new(self.difficulty_level)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(Topic {
            id: self.id,
            name: self.name,
            description: self.description,
            difficulty,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StartQuizRequest {
    pub topic_id: TopicId,
    pub number_of_questions: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionDto {
    pub id: QuestionId,
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    pub difficulty_level: i64,
}

impl QuestionDto {
    pub(crate) fn into_question(self, requested: TopicId) -> Result<Question, ApiError> {
        let difficulty = Difficulty::new(self.difficulty_level)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Question::new(
            self.id,
            self.topic_id.unwrap_or(requested),
            self.question_text,
            self.options,
            self.correct_answer,
            self.explanation,
            difficulty,
        )
        .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerRequest<'a> {
    pub question_id: QuestionId,
    pub selected_answer: &'a str,
    pub response_time: u32,
}

impl<'a> From<&'a AnswerSubmission> for AnswerRequest<'a> {
    fn from(submission: &'a AnswerSubmission) -> Self {
        Self {
            question_id: submission.question_id,
            selected_answer: &submission.selected_answer,
            response_time: submission.response_time.as_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerResponse {
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl AnswerResponse {
    pub(crate) fn into_feedback(self, submitted: QuestionId) -> AnswerFeedback {
        AnswerFeedback {
            question_id: self.question_id.unwrap_or(submitted),
            is_correct: self.is_correct,
            explanation: self.explanation.filter(|text| !text.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizResultDto {
    pub topic_id: TopicId,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub average_response_time: f64,
    pub completed_at: String,
}

impl QuizResultDto {
    pub(crate) fn into_result(self) -> Result<QuizResult, ApiError> {
        Ok(QuizResult {
            topic_id: self.topic_id,
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            average_response_time: self.average_response_time,
            completed_at: parse_timestamp(&self.completed_at)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryEntryDto {
    pub topic_id: TopicId,
    pub topic_name: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub average_response_time: f64,
    pub completed_at: String,
}

impl HistoryEntryDto {
    pub(crate) fn into_entry(self) -> Result<QuizHistoryEntry, ApiError> {
        Ok(QuizHistoryEntry {
            topic_id: self.topic_id,
            topic_name: self.topic_name,
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            average_response_time: self.average_response_time,
            completed_at: parse_timestamp(&self.completed_at)?,
        })
    }
}

/// FastAPI-style error body: `{"detail": "..."}` or a list of validation errors.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub(crate) fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Accepts RFC 3339 and the naive ISO form the server emits for UTC times.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| ApiError::Decode(format!("invalid timestamp '{raw}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_naive_and_offset_timestamps() {
        let naive = parse_timestamp("2024-03-01T12:30:00.250000").unwrap();
        let offset = parse_timestamp("2024-03-01T13:30:00.25+01:00").unwrap();
        assert_eq!(naive, offset);
        assert_eq!(
            parse_timestamp("2024-03-01T12:30:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
        );
        assert!(matches!(parse_timestamp("yesterday"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn question_uses_requested_topic_when_missing() {
        let json = r#"{
            "id": 3,
            "question_text": "What is RAG?",
            "options": ["A", "B", "C", "D"],
            "correct_answer": "A",
            "explanation": "Retrieval augmented generation.",
            "difficulty_level": 3
        }"#;
        let dto: QuestionDto = serde_json::from_str(json).unwrap();
        let question = dto.into_question(TopicId::new(1)).unwrap();
        assert_eq!(question.topic_id(), TopicId::new(1));
        assert_eq!(question.options().len(), 4);
    }

    #[test]
    fn out_of_range_topic_difficulty_is_a_decode_error() {
        let dto = TopicDto {
            id: TopicId::new(1),
            name: "RAG Systems".into(),
            description: String::new(),
            difficulty_level: 9,
        };
        assert!(matches!(dto.into_topic(), Err(ApiError::Decode(_))));
    }

    #[test]
    fn profile_update_sends_empty_password_when_unchanged() {
        let update = ProfileUpdate {
            email: "a@b.c".into(),
            full_name: "A".into(),
            password: None,
        };
        let json = serde_json::to_value(ProfileUpdateRequest::from(&update)).unwrap();
        assert_eq!(json["password"], "");
    }

    #[test]
    fn error_body_message_handles_lists() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Email already registered"}"#).unwrap();
        assert_eq!(body.message(), "Email already registered");
        let body: ErrorBody = serde_json::from_str(r#"{"detail":[{"msg":"field required"}]}"#).unwrap();
        assert!(body.message().contains("field required"));
    }

    #[test]
    fn blank_explanation_in_feedback_is_dropped() {
        let response = AnswerResponse {
            question_id: None,
            is_correct: false,
            explanation: Some("  ".into()),
        };
        let feedback = response.into_feedback(QuestionId::new(4));
        assert_eq!(feedback.question_id, QuestionId::new(4));
        assert_eq!(feedback.explanation, None);
    }
}
