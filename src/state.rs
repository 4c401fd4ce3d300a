use crate::assessment::AssessmentEngine;
use crate::config::Config;
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub engine: AssessmentEngine,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for AssessmentEngine {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}
