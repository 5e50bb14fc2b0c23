#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod auth;
pub mod config;
pub mod error;
pub mod profile_service;
pub mod quiz;
pub mod topic_service;

pub use quiz_core::Clock;

pub use api::{Endpoint, HttpApi, InMemoryApi, NewAccount, QuizApi};
pub use app_services::AppServices;
pub use auth::{AuthState, SessionStore};
pub use config::ClientConfig;
pub use error::{ApiError, AppServicesError, AuthError, LoadError, QuizSessionError, SubmitError};
pub use profile_service::ProfileService;
pub use quiz::{AdvanceOutcome, Progress, QuestionPhase, QuizSession, QuizSessionController};
pub use topic_service::TopicService;
