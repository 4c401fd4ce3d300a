// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

use crate::{
    assessment::{AnswerSet, Classification, classify_score},
    config::UNNAMED_TEAM,
};

/// Represents the 'submissions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,

    /// Sanitized team name.
    pub team: String,

    /// Stored as a flat JSON object, e.g. `{"panel_0_question_1": 3}`.
    pub answers: Json<AnswerSet>,

    /// Maturity score (0-100) computed by the server.
    pub score: i64,

    /// Score before the latest update. 0 for a first submission.
    pub previous_score: i64,

    /// Starts at 1 and increments on every update.
    pub version: i64,

    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// A stored submission decorated with its score delta and maturity band.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    #[serde(flatten)]
    pub submission: Submission,
    pub delta: i64,
    #[serde(flatten)]
    pub classification: Classification,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            delta: submission.score - submission.previous_score,
            classification: classify_score(submission.score),
            submission,
        }
    }
}

/// DTO for creating or updating a submission.
///
/// Clients may also send `score`, `previous_score`, `version` and `timestamp`;
/// those are ignored because the server derives them.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAssessmentRequest {
    #[serde(alias = "teamName")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Team name length must be between 1 and 100 characters."
    ))]
    pub team: String,

    pub answers: AnswerSet,
}

/// Body of the legacy `/api/submit-questionnaire` endpoint.
///
/// The first survey page only posted `{answers, timestamp}`; a team name is
/// optional there and defaults to a placeholder.
#[derive(Debug, Deserialize)]
pub struct LegacySubmitRequest {
    #[serde(default, alias = "teamName")]
    pub team: Option<String>,

    pub answers: AnswerSet,
}

impl From<LegacySubmitRequest> for SubmitAssessmentRequest {
    fn from(req: LegacySubmitRequest) -> Self {
        Self {
            team: req.team.unwrap_or_else(|| UNNAMED_TEAM.to_string()),
            answers: req.answers,
        }
    }
}

/// Row shape for the top scoring teams board.
#[derive(Debug, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub team: String,
    pub score: i64,
    pub version: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct RankedTeam {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    #[serde(flatten)]
    pub classification: Classification,
}

/// Query parameters for listing submissions.
#[derive(Debug, Deserialize)]
pub struct SubmissionListParams {
    /// Substring of the team name. Matched against the lower-cased copy kept
    /// in `team_search`, so case folding covers non-ASCII letters too.
    pub q: Option<String>,

    /// Number of items to return (default: 50, max: 200).
    pub limit: Option<i64>,
}
