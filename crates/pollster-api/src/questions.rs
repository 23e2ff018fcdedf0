use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use pollster_db::Database;
use pollster_db::models::QuestionRow;
use pollster_types::api::{ChoiceView, QuestionDetail, QuestionSummary, VoteRequest};

use crate::AppState;
use crate::error::ApiError;

/// `GET /api/questions` — every question, oldest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<QuestionSummary>>, ApiError> {
    let rows = state.db.list_questions()?;

    let questions = rows.into_iter().map(question_summary).collect();
    Ok(Json(questions))
}

/// `GET /api/question/{question_id}` — one question with its choices.
pub async fn detail(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
) -> Result<Json<QuestionDetail>, ApiError> {
    question_detail(&state.db, question_id).map(Json)
}

/// `POST /api/vote/{question_id}` — record one vote, return the updated
/// question. A missing `choice` field is a 400; a choice that does not
/// resolve within this question is a 404, same as an unknown question.
pub async fn vote(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<QuestionDetail>, ApiError> {
    let choice_id = req
        .choice
        .ok_or_else(|| ApiError::BadRequest("missing choice".into()))?;

    if state.db.get_question(question_id)?.is_none() {
        return Err(ApiError::NotFound);
    }

    if !state.db.increment_choice_vote(question_id, choice_id)? {
        return Err(ApiError::NotFound);
    }

    question_detail(&state.db, question_id).map(Json)
}

fn question_detail(db: &Database, question_id: i64) -> Result<QuestionDetail, ApiError> {
    let question = db.get_question(question_id)?.ok_or(ApiError::NotFound)?;
    let choices = db.get_choices(question_id)?;

    Ok(QuestionDetail {
        question_text: question.question_text,
        pub_date: parse_pub_date(question.id, &question.pub_date),
        id: question.id,
        choices: choices
            .into_iter()
            .map(|c| ChoiceView {
                choice_text: c.choice_text,
                votes: c.votes,
                id: c.id,
            })
            .collect(),
    })
}

fn question_summary(row: QuestionRow) -> QuestionSummary {
    QuestionSummary {
        question_text: row.question_text,
        pub_date: parse_pub_date(row.id, &row.pub_date),
        id: row.id,
    }
}

fn parse_pub_date(question_id: i64, raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite's datetime('now') default stores "YYYY-MM-DD HH:MM:SS"
            // without a timezone. Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt pub_date '{}' on question {}: {}", raw, question_id, e);
            DateTime::default()
        })
}
