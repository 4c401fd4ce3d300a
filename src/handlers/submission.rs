// src/handlers/submission.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::{SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    assessment::{AssessmentEngine, classify_score},
    config::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, TOP_TEAMS_LIMIT},
    error::AppError,
    models::submission::{
        LeaderboardEntry, LegacySubmitRequest, RankedTeam, Submission, SubmissionListParams,
        SubmissionResponse, SubmitAssessmentRequest,
    },
    utils::html::clean_label,
};

/// Sanitizes and validates a submit payload, then scores it.
///
/// Only complete assessments can be stored.
fn score_submission(
    engine: &AssessmentEngine,
    req: &mut SubmitAssessmentRequest,
) -> Result<i64, AppError> {
    req.team = clean_label(&req.team);
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    engine.validate(&req.answers)?;

    let completion = engine.overall_completion(&req.answers);
    if completion.answered < completion.total {
        return Err(AppError::BadRequest(format!(
            "Assessment is incomplete: {} of {} questions answered",
            completion.answered, completion.total
        )));
    }

    Ok(i64::from(engine.total_score(&req.answers)))
}

/// Lower-cases the query and escapes LIKE wildcards so user input only
/// matches literally against `team_search`.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Scores and inserts a new submission at version 1 with a previous score of 0.
async fn insert_submission(
    pool: &SqlitePool,
    engine: &AssessmentEngine,
    mut req: SubmitAssessmentRequest,
) -> Result<Submission, AppError> {
    let score = score_submission(engine, &mut req)?;

    let submission = sqlx::query_as::<_, Submission>(
        r#"
        INSERT INTO submissions (team, team_search, answers, score, previous_score, version, timestamp)
        VALUES (?, ?, ?, ?, 0, 1, ?)
        RETURNING id, team, answers, score, previous_score, version, timestamp
        "#,
    )
    .bind(&req.team)
    .bind(req.team.to_lowercase())
    .bind(SqlJson(&req.answers))
    .bind(score)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create submission: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!(
        "Submission {} created for team '{}' with score {}",
        submission.id,
        submission.team,
        submission.score
    );

    Ok(submission)
}

/// Stores a new assessment result.
///
/// * Recomputes the score from the answers (client-sent scores are ignored).
/// * Starts the record at version 1 with a previous score of 0.
pub async fn create_submission(
    State(pool): State<SqlitePool>,
    State(engine): State<AssessmentEngine>,
    Json(req): Json<SubmitAssessmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let submission = insert_submission(&pool, &engine, req).await?;
    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(submission))))
}

/// Stores a result posted by the first survey page as `{answers, timestamp}`.
/// A missing team name falls back to a placeholder.
pub async fn create_legacy_submission(
    State(pool): State<SqlitePool>,
    State(engine): State<AssessmentEngine>,
    Json(req): Json<LegacySubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let submission = insert_submission(&pool, &engine, req.into()).await?;
    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(submission))))
}

/// Re-submits an existing assessment.
///
/// The stored score moves to `previous_score`, the new score is computed from
/// the new answers and the version is bumped.
pub async fn update_submission(
    State(pool): State<SqlitePool>,
    State(engine): State<AssessmentEngine>,
    Path(id): Path<i64>,
    Json(mut req): Json<SubmitAssessmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let score = score_submission(&engine, &mut req)?;

    // SQLite evaluates every SET expression against the old row,
    // so `previous_score = score` captures the score being replaced.
    let submission = sqlx::query_as::<_, Submission>(
        r#"
        UPDATE submissions
        SET team = ?,
            team_search = ?,
            answers = ?,
            previous_score = score,
            score = ?,
            version = version + 1,
            timestamp = ?
        WHERE id = ?
        RETURNING id, team, answers, score, previous_score, version, timestamp
        "#,
    )
    .bind(&req.team)
    .bind(req.team.to_lowercase())
    .bind(SqlJson(&req.answers))
    .bind(score)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update submission {}: {:?}", id, e);
        AppError::InternalServerError(e.to_string())
    })?
    .ok_or(AppError::NotFound("Submission not found".to_string()))?;

    tracing::info!(
        "Submission {} updated to version {} ({} -> {})",
        submission.id,
        submission.version,
        submission.previous_score,
        submission.score
    );

    Ok(Json(SubmissionResponse::from(submission)))
}

/// Retrieves a single submission, e.g. to rehydrate the survey for editing.
pub async fn get_submission(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let submission = sqlx::query_as::<_, Submission>(
        r#"
        SELECT id, team, answers, score, previous_score, version, timestamp
        FROM submissions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Submission not found".to_string()))?;

    Ok(Json(SubmissionResponse::from(submission)))
}

/// Lists submissions, most recently submitted first.
/// Optionally filtered by a team name substring.
pub async fn list_submissions(
    State(pool): State<SqlitePool>,
    Query(params): Query<SubmissionListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let pattern = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(like_pattern);

    let submissions = sqlx::query_as::<_, Submission>(
        r#"
        SELECT id, team, answers, score, previous_score, version, timestamp
        FROM submissions
        WHERE (? IS NULL OR team_search LIKE ? ESCAPE '\')
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(pattern.clone())
    .bind(pattern)
    .bind(limit)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list submissions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let body: Vec<SubmissionResponse> = submissions
        .into_iter()
        .map(SubmissionResponse::from)
        .collect();

    Ok(Json(body))
}

/// Retrieves the top 10 scoring teams.
/// Ties go to the team that reached the score first.
pub async fn top_teams(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let entries = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT id, team, score, version, timestamp
        FROM submissions
        ORDER BY score DESC, timestamp ASC, id ASC
        LIMIT ?
        "#,
    )
    .bind(TOP_TEAMS_LIMIT)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch top teams: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let ranked: Vec<RankedTeam> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| RankedTeam {
            rank: index + 1,
            classification: classify_score(entry.score),
            entry,
        })
        .collect();

    Ok(Json(ranked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{AnswerSet, Questionnaire};

    fn complete_answers(engine: &AssessmentEngine, ordinal: usize) -> AnswerSet {
        let mut answers = AnswerSet::new();
        for (p, panel) in engine.questionnaire().panels().iter().enumerate() {
            for q in 0..panel.questions.len() {
                answers = engine.record_answer(&answers, p, q, ordinal).unwrap();
            }
        }
        answers
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("core"), "%core%");
        assert_eq!(like_pattern("100%_up"), "%100\\%\\_up%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_like_pattern_lowercases_unicode() {
        assert_eq!(like_pattern("ÜBER Ops"), "%über ops%");
        assert_eq!(like_pattern("R&D"), "%r&d%");
    }

    #[test]
    fn test_score_submission_complete() {
        let engine = AssessmentEngine::new(Questionnaire::sre_maturity());
        let mut req = SubmitAssessmentRequest {
            team: "  <i>Edge</i> Team ".to_string(),
            answers: complete_answers(&engine, 4),
        };

        assert_eq!(score_submission(&engine, &mut req).unwrap(), 80);
        assert_eq!(req.team, "Edge Team");
    }

    #[test]
    fn test_score_submission_rejects_incomplete() {
        let engine = AssessmentEngine::new(Questionnaire::sre_maturity());
        let answers = engine.record_answer(&AnswerSet::new(), 0, 0, 5).unwrap();
        let mut req = SubmitAssessmentRequest {
            team: "Edge".to_string(),
            answers,
        };

        match score_submission(&engine, &mut req) {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("1 of 21"), "{msg}"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_score_submission_rejects_markup_only_team() {
        let engine = AssessmentEngine::new(Questionnaire::sre_maturity());
        let mut req = SubmitAssessmentRequest {
            team: "<script>x</script>".to_string(),
            answers: complete_answers(&engine, 1),
        };

        assert!(matches!(
            score_submission(&engine, &mut req),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_score_submission_keeps_ampersand_team() {
        let engine = AssessmentEngine::new(Questionnaire::sre_maturity());
        let mut req = SubmitAssessmentRequest {
            team: "&".repeat(30),
            answers: complete_answers(&engine, 5),
        };

        assert_eq!(score_submission(&engine, &mut req).unwrap(), 100);
        assert_eq!(req.team, "&".repeat(30));
    }
}
