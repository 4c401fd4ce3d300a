// src/assessment/error.rs

use thiserror::Error;

/// Errors raised by the assessment engine.
///
/// Index errors reject a single mutation and leave the caller's answers untouched.
/// Definition errors describe a questionnaire that can never be scored and are
/// fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    #[error("panel {panel} does not exist")]
    PanelOutOfRange { panel: usize },

    #[error("question {question} does not exist in panel {panel}")]
    QuestionOutOfRange { panel: usize, question: usize },

    #[error("option {option} is not valid for panel {panel} question {question}")]
    OptionOutOfRange {
        panel: usize,
        question: usize,
        option: usize,
    },

    #[error("malformed answer key `{0}`, expected `panel_<p>_question_<q>`")]
    MalformedKey(String),

    #[error("questionnaire has no panels")]
    EmptyQuestionnaire,

    #[error("panel `{0}` has no questions")]
    EmptyPanel(String),

    #[error("question `{0}` needs at least two options")]
    TooFewOptions(String),

    #[error("invalid questionnaire definition: {0}")]
    MalformedDefinition(String),
}
