// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{assessment, submission},
    state::AppState,
};

/// Builds the CORS policy from the configured dashboard origins.
/// Origins that are not valid header values are skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
}

/// Assembles the main application router.
///
/// * Merges the assessment and submission sub-routers.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool, Engine, Config).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let assessment_routes = Router::new()
        .route("/evaluate", post(assessment::evaluate))
        .route("/answers", post(assessment::record_answer));

    let submission_routes = Router::new()
        .route(
            "/",
            get(submission::list_submissions).post(submission::create_submission),
        )
        .route("/top", get(submission::top_teams))
        .route(
            "/{id}",
            get(submission::get_submission).put(submission::update_submission),
        );

    Router::new()
        .route("/api/questionnaire", get(assessment::get_questionnaire))
        // Path used by the first version of the survey page.
        .route(
            "/api/submit-questionnaire",
            post(submission::create_legacy_submission),
        )
        .nest("/api/assessment", assessment_routes)
        .nest("/api/submissions", submission_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
