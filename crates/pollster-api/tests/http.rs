//! End-to-end tests driving the real router over both flows: HTML pages and
//! the JSON API, backed by an in-memory database.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use pollster_api::{AppState, AppStateInner, router};
use pollster_db::Database;

struct Fixture {
    state: AppState,
    app: Router,
    question_id: i64,
    red: i64,
    blue: i64,
}

fn ts(raw: &str) -> DateTime<Utc> {
    raw.parse().unwrap()
}

/// One question, "Favorite color?", with Red at 3 votes and Blue at 1.
fn fixture() -> Fixture {
    let db = Database::open_in_memory().unwrap();

    let question_id = db
        .create_question("Favorite color?", ts("2026-01-05T12:00:00Z"))
        .unwrap();
    let red = db.create_choice(question_id, "Red").unwrap();
    let blue = db.create_choice(question_id, "Blue").unwrap();
    for _ in 0..3 {
        assert!(db.increment_choice_vote(question_id, red).unwrap());
    }
    assert!(db.increment_choice_vote(question_id, blue).unwrap());

    let state: AppState = Arc::new(AppStateInner { db });
    Fixture {
        app: router(state.clone()),
        state,
        question_id,
        red,
        blue,
    }
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn votes_of(f: &Fixture, choice_id: i64) -> i64 {
    f.state
        .db
        .get_choices(f.question_id)
        .unwrap()
        .iter()
        .find(|c| c.id == choice_id)
        .unwrap()
        .votes
}

// -- JSON API --

#[tokio::test]
async fn api_question_listing_is_ascending_and_uncapped() {
    let f = fixture();
    for i in 0..6 {
        f.state
            .db
            .create_question(
                &format!("Later question {i}"),
                ts(&format!("2026-02-0{}T12:00:00Z", i + 1)),
            )
            .unwrap();
    }

    let response = get(&f.app, "/api/questions").await;
    assert_eq!(response.status(), StatusCode::OK);

    let listing = body_json(response).await;
    let questions = listing.as_array().unwrap();
    assert_eq!(questions.len(), 7);
    assert_eq!(questions[0]["question_text"], "Favorite color?");
    assert_eq!(questions[6]["question_text"], "Later question 5");
    assert_eq!(questions[0]["id"], f.question_id);
    assert!(questions[0]["pub_date"].is_string());
}

#[tokio::test]
async fn api_question_detail_returns_question_with_choices() {
    let f = fixture();

    let response = get(&f.app, &format!("/api/question/{}", f.question_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail = body_json(response).await;
    assert_eq!(detail["question_text"], "Favorite color?");
    assert_eq!(detail["id"], f.question_id);

    let choices = detail["choices"].as_array().unwrap();
    assert_eq!(choices.len(), 2);
    assert_eq!(choices[0]["choice_text"], "Red");
    assert_eq!(choices[0]["votes"], 3);
    assert_eq!(choices[1]["choice_text"], "Blue");
    assert_eq!(choices[1]["votes"], 1);
}

#[tokio::test]
async fn api_question_detail_unknown_id_is_not_found() {
    let f = fixture();

    let response = get(&f.app, "/api/question/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_vote_increments_and_returns_updated_question() {
    let f = fixture();

    let response = post_json(
        &f.app,
        &format!("/api/vote/{}", f.question_id),
        json!({ "choice": f.blue }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail = body_json(response).await;
    let choices = detail["choices"].as_array().unwrap();
    assert_eq!(choices[1]["votes"], 2);
    assert_eq!(choices[0]["votes"], 3);

    assert_eq!(votes_of(&f, f.blue), 2);
    assert_eq!(votes_of(&f, f.red), 3);
}

#[tokio::test]
async fn api_vote_missing_choice_is_bad_request() {
    let f = fixture();

    let response = post_json(&f.app, &format!("/api/vote/{}", f.question_id), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(votes_of(&f, f.red), 3);
    assert_eq!(votes_of(&f, f.blue), 1);
}

#[tokio::test]
async fn api_vote_unknown_choice_is_not_found() {
    let f = fixture();

    let response = post_json(
        &f.app,
        &format!("/api/vote/{}", f.question_id),
        json!({ "choice": 999 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(votes_of(&f, f.red), 3);
    assert_eq!(votes_of(&f, f.blue), 1);
}

#[tokio::test]
async fn api_vote_rejects_choice_of_another_question() {
    let f = fixture();
    let other = f
        .state
        .db
        .create_question("Favorite meal?", ts("2026-01-06T12:00:00Z"))
        .unwrap();
    let breakfast = f.state.db.create_choice(other, "Breakfast").unwrap();

    let response = post_json(
        &f.app,
        &format!("/api/vote/{}", f.question_id),
        json!({ "choice": breakfast }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let other_choices = f.state.db.get_choices(other).unwrap();
    assert_eq!(other_choices[0].votes, 0);
}

#[tokio::test]
async fn api_vote_unknown_question_is_not_found() {
    let f = fixture();

    let response = post_json(&f.app, "/api/vote/999", json!({ "choice": f.red })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- HTML pages --

#[tokio::test]
async fn index_page_caps_at_five_newest() {
    let f = fixture();
    for i in 0..6 {
        f.state
            .db
            .create_question(
                &format!("Later question {i}"),
                ts(&format!("2026-02-0{}T12:00:00Z", i + 1)),
            )
            .unwrap();
    }

    let response = get(&f.app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert_eq!(html.matches("<li>").count(), 5);
    assert!(html.contains("Later question 5"));
    // The oldest question falls off the front page.
    assert!(!html.contains("Favorite color?"));
}

#[tokio::test]
async fn detail_page_shows_voting_form() {
    let f = fixture();

    let response = get(&f.app, &format!("/{}/", f.question_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("Favorite color?"));
    assert!(html.contains(&format!("action=\"/{}/vote/\"", f.question_id)));
    assert!(html.contains("Red"));
    assert!(html.contains("Blue"));
}

#[tokio::test]
async fn detail_page_unknown_id_is_not_found() {
    let f = fixture();

    let response = get(&f.app, "/999/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn page_vote_redirects_to_results() {
    let f = fixture();

    let response = post_form(
        &f.app,
        &format!("/{}/vote/", f.question_id),
        &format!("choice={}", f.blue),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION].to_str().unwrap(),
        format!("/{}/results", f.question_id)
    );

    assert_eq!(votes_of(&f, f.blue), 2);
    assert_eq!(votes_of(&f, f.red), 3);
}

#[tokio::test]
async fn page_vote_without_choice_redisplays_form() {
    let f = fixture();

    let response = post_form(&f.app, &format!("/{}/vote/", f.question_id), "").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("You didn&#39;t select a choice."));
    assert!(html.contains(&format!("action=\"/{}/vote/\"", f.question_id)));

    assert_eq!(votes_of(&f, f.red), 3);
    assert_eq!(votes_of(&f, f.blue), 1);
}

#[tokio::test]
async fn page_vote_with_bogus_choice_redisplays_form() {
    let f = fixture();

    let response = post_form(&f.app, &format!("/{}/vote/", f.question_id), "choice=999").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("You didn&#39;t select a choice."));

    assert_eq!(votes_of(&f, f.red), 3);
    assert_eq!(votes_of(&f, f.blue), 1);
}

#[tokio::test]
async fn page_vote_unknown_question_is_not_found() {
    let f = fixture();

    let response = post_form(&f.app, "/999/vote/", "choice=1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn results_page_shows_tallies() {
    let f = fixture();

    let response = get(&f.app, &format!("/{}/results", f.question_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("Red -- 3 votes"));
    assert!(html.contains("Blue -- 1 vote"));
    assert!(html.contains(&format!("href=\"/{}/\"", f.question_id)));
}
