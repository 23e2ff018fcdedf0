pub mod error;
pub mod pages;
pub mod questions;
pub mod render;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use pollster_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// The full routing table: HTML pages at the root, the JSON API under /api.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/{question_id}/", get(pages::detail))
        .route("/{question_id}/results", get(pages::results))
        .route("/{question_id}/vote/", post(pages::vote))
        .route("/api/questions", get(questions::list))
        .route("/api/question/{question_id}", get(questions::detail))
        .route("/api/vote/{question_id}", post(questions::vote))
        .with_state(state)
}
