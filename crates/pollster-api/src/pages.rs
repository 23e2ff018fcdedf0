use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;
use crate::render;

/// The index page shows at most this many questions.
const INDEX_PAGE_LIMIT: u32 = 5;

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub choice: Option<i64>,
}

/// `GET /` — the most recent questions, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let questions = state.db.list_recent_questions(INDEX_PAGE_LIMIT)?;

    Ok(Html(render::index(&questions)))
}

/// `GET /{question_id}/` — question with its voting form.
pub async fn detail(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    let question = state
        .db
        .get_question(question_id)?
        .ok_or(ApiError::NotFound)?;
    let choices = state.db.get_choices(question_id)?;

    Ok(Html(render::detail(&question, &choices, None)))
}

/// `GET /{question_id}/results` — current tallies.
pub async fn results(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    let question = state
        .db
        .get_question(question_id)?
        .ok_or(ApiError::NotFound)?;
    let choices = state.db.get_choices(question_id)?;

    Ok(Html(render::results(&question, &choices)))
}

/// `POST /{question_id}/vote/` — form flow. Success redirects to the results
/// page; a missing or non-resolving selection redisplays the form with one
/// generic message (the form flow does not distinguish the two).
pub async fn vote(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Form(form): Form<VoteForm>,
) -> Result<Response, ApiError> {
    let question = state
        .db
        .get_question(question_id)?
        .ok_or(ApiError::NotFound)?;

    let voted = match form.choice {
        Some(choice_id) => state.db.increment_choice_vote(question_id, choice_id)?,
        None => false,
    };

    if !voted {
        let choices = state.db.get_choices(question_id)?;
        let page = render::detail(&question, &choices, Some("You didn't select a choice."));
        return Ok(Html(page).into_response());
    }

    Ok(Redirect::to(&format!("/{question_id}/results")).into_response())
}
