//! Quiz sessions: the per-question state machine and its API orchestration.

mod controller;
mod session;

pub use controller::{AdvanceOutcome, QuizSessionController};
pub use session::{Progress, QuestionPhase, QuizSession};
