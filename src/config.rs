// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Number of entries shown on the top scoring teams board.
pub const TOP_TEAMS_LIMIT: i64 = 10;

/// Page size for submission listings when the client does not ask for one.
pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

/// Team recorded for legacy submissions that carry no team name.
pub const UNNAMED_TEAM: &str = "Unnamed team";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub port: u16,
    pub log_dir: String,
    /// Origins allowed by CORS, e.g. the dashboard dev server.
    pub cors_origins: Vec<String>,
    /// Optional JSON file replacing the built-in questionnaire.
    pub questionnaire_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://assessment.db".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .map(|p| p.parse().expect("PORT must be a valid port number"))
            .unwrap_or(8080);

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let questionnaire_path = env::var("QUESTIONNAIRE_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty());

        Self {
            database_url,
            rust_log,
            port,
            log_dir,
            cors_origins,
            questionnaire_path,
        }
    }
}
