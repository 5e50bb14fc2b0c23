use std::fmt;
use thiserror::Error;

use crate::model::ids::TopicId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DifficultyError {
    #[error("difficulty must be between 1 and 5, got {0}")]
    OutOfRange(i64),
}

/// Ordinal difficulty on the 1–5 scale used for topics and questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns `DifficultyError::OutOfRange` outside `1..=5`.
    pub fn new(level: i64) -> Result<Self, DifficultyError> {
        match u8::try_from(level) {
            Ok(level) if (Self::MIN..=Self::MAX).contains(&level) => Ok(Self(level)),
            _ => Err(DifficultyError::OutOfRange(level)),
        }
    }

    #[must_use]
    pub fn level(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// A subject area with a pool of questions. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
}
