use quiz_core::model::QuizResult;
use services::{QuestionPhase, QuizSession};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub text: String,
    pub class: &'static str,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub question_id: u64,
    pub progress_label: String,
    pub difficulty_label: String,
    pub text: String,
    pub options: Vec<OptionVm>,
    /// Shown once the server has graded the answer.
    pub explanation: Option<String>,
    pub pending: bool,
    pub next_label: &'static str,
}

impl QuestionVm {
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.explanation.is_some()
    }
}

fn option_class(phase: &QuestionPhase, option: &str) -> &'static str {
    match phase {
        QuestionPhase::Submitting { selected } if selected == option => "option pending",
        QuestionPhase::Answered { selected, feedback } if selected == option => {
            if feedback.is_correct {
                "option correct"
            } else {
                "option incorrect"
            }
        }
        _ => "option",
    }
}

#[must_use]
pub fn map_question(session: &QuizSession) -> Option<QuestionVm> {
    if session.is_complete() {
        return None;
    }
    let question = session.current_question()?;
    let phase = session.phase();
    let locked = !matches!(phase, QuestionPhase::Unanswered);

    let options = question
        .options()
        .iter()
        .map(|option| OptionVm {
            text: option.clone(),
            class: option_class(phase, option),
            disabled: locked,
        })
        .collect();

    let explanation = session.feedback().map(|feedback| {
        feedback
            .explanation
            .clone()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| question.explanation().to_string())
    });

    Some(QuestionVm {
        question_id: question.id().value(),
        progress_label: format!("Question {} of {}", session.position(), session.total()),
        difficulty_label: format!("Difficulty: {}", question.difficulty()),
        text: question.text().to_string(),
        options,
        explanation,
        pending: matches!(phase, QuestionPhase::Submitting { .. }),
        next_label: if session.is_last() {
            "Finish Quiz"
        } else {
            "Next Question"
        },
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub score_line: String,
    pub average_line: String,
    pub percent: u32,
}

#[must_use]
pub fn map_result(result: &QuizResult) -> ResultVm {
    ResultVm {
        score_line: format!(
            "You scored {} out of {} questions correctly!",
            result.correct_answers, result.total_questions
        ),
        average_line: format!(
            "Average response time: {:.1} seconds",
            result.average_response_time
        ),
        percent: result.score_percent(),
    }
}
