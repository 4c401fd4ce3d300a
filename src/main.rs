// src/main.rs

use dotenvy::dotenv;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sre_assessment::assessment::{AssessmentEngine, Questionnaire};
use sre_assessment::config::Config;
use sre_assessment::routes;
use sre_assessment::state::AppState;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "assessment.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // An unusable questionnaire is a configuration error, not a runtime condition
    let questionnaire = load_questionnaire(&config);
    tracing::info!(
        "Questionnaire loaded: {} panels, {} questions",
        questionnaire.panels().len(),
        questionnaire.total_questions()
    );

    let pool = connect_with_retry(&config.database_url).await;
    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    // Create AppState
    let state = AppState {
        pool,
        config: config.clone(),
        engine: AssessmentEngine::new(questionnaire),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}

fn load_questionnaire(config: &Config) -> Questionnaire {
    match &config.questionnaire_path {
        Some(path) => {
            tracing::info!("Loading questionnaire from {}", path);
            let raw = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("Failed to read questionnaire {}: {}", path, e));
            Questionnaire::from_json(&raw)
                .unwrap_or_else(|e| panic!("Invalid questionnaire {}: {}", path, e))
        }
        None => Questionnaire::sre_maturity(),
    }
}

/// Opens the SQLite pool, creating the database file if needed.
/// Gives up after 5 failed attempts.
async fn connect_with_retry(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("DATABASE_URL is not a valid SQLite URL")
        .create_if_missing(true);

    let mut retry_count = 0;
    loop {
        match SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options.clone())
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}
