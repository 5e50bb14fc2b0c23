use dioxus::prelude::*;
use services::{LoadError, SubmitError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    /// The server stopped accepting the session token.
    SessionExpired,
    NoQuestions,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Something went wrong. Please try again.",
            Self::SessionExpired => "Your session has expired. Please log in again.",
            Self::NoQuestions => "No questions available",
        }
    }

    #[must_use]
    pub fn from_load(err: &LoadError) -> Self {
        match err {
            LoadError::Unauthorized => Self::SessionExpired,
            LoadError::NoQuestions => Self::NoQuestions,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn from_submit(err: &SubmitError) -> Self {
        match err {
            SubmitError::Unauthorized => Self::SessionExpired,
            _ => Self::Unknown,
        }
    }
}

impl From<LoadError> for ViewError {
    fn from(err: LoadError) -> Self {
        Self::from_load(&err)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
