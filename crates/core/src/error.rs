use thiserror::Error;

use crate::model::{DifficultyError, ProfileError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Difficulty(#[from] DifficultyError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}
