// src/models/assessment.rs

use serde::{Deserialize, Serialize};

use crate::assessment::{AnswerSet, AssessmentReport};

/// DTO for scoring an in-progress answer set without storing it.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub answers: AnswerSet,
}

/// DTO for recording a single radio selection.
#[derive(Debug, Deserialize)]
pub struct RecordAnswerRequest {
    /// Answers recorded so far. Missing means a fresh survey.
    #[serde(default)]
    pub answers: AnswerSet,
    pub panel: usize,
    pub question: usize,
    pub option: usize,
}

#[derive(Debug, Serialize)]
pub struct RecordAnswerResponse {
    pub answers: AnswerSet,
    pub report: AssessmentReport,
}
