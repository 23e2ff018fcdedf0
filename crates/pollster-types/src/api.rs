use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Questions --

/// Brief question representation used by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub id: i64,
    pub choices: Vec<ChoiceView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceView {
    pub choice_text: String,
    pub votes: i64,
    pub id: i64,
}

// -- Votes --

/// Body of `POST /api/vote/{question_id}`. The `choice` field is optional so
/// a missing selector can be reported as a 400 rather than a decode failure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoteRequest {
    pub choice: Option<i64>,
}
