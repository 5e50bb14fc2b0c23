mod answer;
mod ids;
mod question;
mod topic;
mod user;

pub use answer::{AnswerFeedback, AnswerSubmission, QuizHistoryEntry, QuizResult, ResponseTime};
pub use ids::{ParseIdError, QuestionId, TopicId, UserId};
pub use question::{Question, QuestionError};
pub use topic::{Difficulty, DifficultyError, Topic};
pub use user::{
    ProfileDraft, ProfileError, ProfileUpdate, SessionToken, TokenError, User, validate_email,
};
