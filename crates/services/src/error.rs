//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ProfileError, TokenError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Failures of a single call against the study API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("request was not authorized")]
    Unauthorized,
    #[error("resource not found")]
    NotFound,
    #[error("request rejected: {0}")]
    BadRequest(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted by `SessionStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("email already registered")]
    AlreadyRegistered,
    #[error("registration rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Invalid(#[from] ProfileError),
    #[error(transparent)]
    InvalidToken(#[from] TokenError),
    #[error("another sign-in is already in progress")]
    Busy,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while fetching topics, questions, results, history or the profile.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("no questions available for this topic")]
    NoQuestions,
    #[error("results are available once the quiz is complete")]
    NotReady,
    #[error("session expired")]
    Unauthorized,
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for LoadError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::Unauthorized,
            other => Self::Api(other),
        }
    }
}

/// State-machine rejections of a quiz session. None of these touch the network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("quiz session already completed")]
    Completed,
    #[error("current question has not been answered yet")]
    Unanswered,
    #[error("an answer for this question is still being submitted")]
    SubmissionPending,
    #[error("current question was already answered")]
    AlreadyAnswered,
    #[error("'{0}' is not one of the offered options")]
    UnknownOption(String),
}

/// Errors emitted when submitting an answer or a profile change.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] QuizSessionError),
    #[error(transparent)]
    Invalid(#[from] ProfileError),
    #[error("email already registered")]
    EmailTaken,
    #[error("session expired")]
    Unauthorized,
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for SubmitError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::Unauthorized,
            other => Self::Api(other),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
