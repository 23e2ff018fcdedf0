use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use pollster_api::{AppState, AppStateInner};
use pollster_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pollster=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("POLLSTER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("POLLSTER_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let db_path = std::env::var("POLLSTER_DB_PATH").unwrap_or_else(|_| "pollster.db".into());

    // Init database
    let db = Database::open(&PathBuf::from(&db_path))?;
    seed_from_env(&db)?;

    // Shared state and routes
    let state: AppState = Arc::new(AppStateInner { db });

    let app = pollster_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Pollster server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed one question from the environment, but only into an empty database,
/// so restarts don't plant duplicates.
fn seed_from_env(db: &Database) -> anyhow::Result<()> {
    let (Ok(question_text), Ok(choices)) = (
        std::env::var("POLLSTER_SEED_QUESTION"),
        std::env::var("POLLSTER_SEED_CHOICES"),
    ) else {
        return Ok(());
    };

    let labels: Vec<&str> = choices
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if labels.is_empty() {
        return Ok(());
    }

    if db.count_questions()? > 0 {
        return Ok(());
    }

    let question_id = db.create_question(&question_text, chrono::Utc::now())?;
    for label in &labels {
        db.create_choice(question_id, label)?;
    }

    info!(
        "Seeded question {} ({:?}) with {} choices",
        question_id,
        question_text,
        labels.len()
    );
    Ok(())
}
