// src/handlers/assessment.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    assessment::AssessmentEngine,
    error::AppError,
    models::assessment::{EvaluateRequest, RecordAnswerRequest, RecordAnswerResponse},
};

/// Returns the panel table the survey is rendered from.
pub async fn get_questionnaire(State(engine): State<AssessmentEngine>) -> impl IntoResponse {
    Json(engine.questionnaire().clone())
}

/// Scores an in-progress answer set.
///
/// Nothing is stored. Used by the survey page for its progress bar, panel
/// badges and the live score.
pub async fn evaluate(
    State(engine): State<AssessmentEngine>,
    Json(req): Json<EvaluateRequest>,
) -> Result<impl IntoResponse, AppError> {
    engine.validate(&req.answers)?;

    Ok(Json(engine.report(&req.answers)))
}

/// Records one answer and returns the updated set with a fresh report.
///
/// Out-of-range panel, question or option indices are rejected with 400.
pub async fn record_answer(
    State(engine): State<AssessmentEngine>,
    Json(req): Json<RecordAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    engine.validate(&req.answers)?;

    let answers = engine.record_answer(&req.answers, req.panel, req.question, req.option)?;
    let report = engine.report(&answers);

    Ok(Json(RecordAnswerResponse { answers, report }))
}
