use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS questions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            question_text   TEXT NOT NULL,
            pub_date        TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_questions_pub_date
            ON questions(pub_date);

        CREATE TABLE IF NOT EXISTS choices (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            question_id     INTEGER NOT NULL
                                REFERENCES questions(id) ON DELETE CASCADE,
            choice_text     TEXT NOT NULL,
            votes           INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_choices_question
            ON choices(question_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
