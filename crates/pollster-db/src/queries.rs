use crate::Database;
use crate::models::{ChoiceRow, QuestionRow};
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

/// Upper bound on question and choice text length.
pub const MAX_TEXT_LEN: usize = 256;

impl Database {
    // -- Questions --

    /// Administrative operation: no HTTP endpoint creates questions.
    /// Used by startup seeding and tests.
    pub fn create_question(&self, question_text: &str, pub_date: DateTime<Utc>) -> Result<i64> {
        validate_text("question text", question_text)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO questions (question_text, pub_date) VALUES (?1, ?2)",
                params![question_text, pub_date.to_rfc3339()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Deletes a question; its choices go with it via the FK cascade.
    /// Returns false if no question had that id.
    pub fn delete_question(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM questions WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    pub fn get_question(&self, id: i64) -> Result<Option<QuestionRow>> {
        self.with_conn(|conn| query_question(conn, id))
    }

    /// Full listing, oldest first.
    pub fn list_questions(&self) -> Result<Vec<QuestionRow>> {
        self.with_conn(|conn| {
            query_questions(
                conn,
                "SELECT id, question_text, pub_date FROM questions ORDER BY pub_date ASC",
            )
        })
    }

    /// The `limit` most recently published questions, newest first.
    pub fn list_recent_questions(&self, limit: u32) -> Result<Vec<QuestionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, question_text, pub_date FROM questions
                 ORDER BY pub_date DESC
                 LIMIT ?1",
            )?;

            let rows = stmt
                .query_map([limit], map_question_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn count_questions(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    // -- Choices --

    /// Administrative operation, paired with [`Database::create_question`].
    /// The FK constraint rejects choices for questions that don't exist.
    pub fn create_choice(&self, question_id: i64, choice_text: &str) -> Result<i64> {
        validate_text("choice text", choice_text)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO choices (question_id, choice_text) VALUES (?1, ?2)",
                params![question_id, choice_text],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Choices of a question in creation order. Empty for unknown questions;
    /// callers that care check the question first.
    pub fn get_choices(&self, question_id: i64) -> Result<Vec<ChoiceRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, question_id, choice_text, votes FROM choices
                 WHERE question_id = ?1
                 ORDER BY id ASC",
            )?;

            let rows = stmt
                .query_map([question_id], map_choice_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Adds one vote to a choice as a single UPDATE; concurrent votes cannot
    /// lose increments. The `question_id` guard rejects choices that belong
    /// to a different question. Returns false when nothing matched.
    pub fn increment_choice_vote(&self, question_id: i64, choice_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE choices SET votes = votes + 1 WHERE id = ?1 AND question_id = ?2",
                params![choice_id, question_id],
            )?;
            Ok(updated > 0)
        })
    }
}

fn validate_text(what: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        bail!("{} must not be empty", what);
    }
    if text.chars().count() > MAX_TEXT_LEN {
        bail!("{} exceeds {} characters", what, MAX_TEXT_LEN);
    }
    Ok(())
}

fn query_question(conn: &Connection, id: i64) -> Result<Option<QuestionRow>> {
    let mut stmt =
        conn.prepare("SELECT id, question_text, pub_date FROM questions WHERE id = ?1")?;

    let row = stmt.query_row([id], map_question_row).optional()?;

    Ok(row)
}

fn query_questions(conn: &Connection, sql: &str) -> Result<Vec<QuestionRow>> {
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt
        .query_map([], map_question_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_question_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<QuestionRow> {
    Ok(QuestionRow {
        id: row.get(0)?,
        question_text: row.get(1)?,
        pub_date: row.get(2)?,
    })
}

fn map_choice_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChoiceRow> {
    Ok(ChoiceRow {
        id: row.get(0)?,
        question_id: row.get(1)?,
        choice_text: row.get(2)?,
        votes: row.get(3)?,
    })
}
