/// Row types mapped straight from SQLite. Timestamps stay as raw TEXT here;
/// parsing to `DateTime` happens at the API boundary, which also tolerates
/// SQLite's own `datetime('now')` format.

pub struct QuestionRow {
    pub id: i64,
    pub question_text: String,
    pub pub_date: String,
}

pub struct ChoiceRow {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub votes: i64,
}
