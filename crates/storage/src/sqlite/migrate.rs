use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates packages, questions, sessions, answers, study materials and indexes.
#[allow(clippy::too_many_lines)]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if is_applied(pool, 1).await? {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS packages (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                time_limit_minutes INTEGER NOT NULL CHECK (time_limit_minutes >= 0)
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY,
                package_id INTEGER NOT NULL,
                number INTEGER NOT NULL CHECK (number >= 0),
                category TEXT NOT NULL CHECK (category IN ('TWK', 'TIU', 'TKP')),
                topic TEXT NOT NULL,
                text TEXT NOT NULL,
                option_a TEXT NOT NULL,
                option_b TEXT NOT NULL,
                option_c TEXT NOT NULL,
                option_d TEXT NOT NULL,
                option_e TEXT NOT NULL,
                correct_option TEXT CHECK (correct_option IN ('A', 'B', 'C', 'D', 'E')),
                weight_a REAL,
                weight_b REAL,
                weight_c REAL,
                weight_d REAL,
                weight_e REAL,
                FOREIGN KEY (package_id) REFERENCES packages(id) ON DELETE CASCADE
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                package_id INTEGER NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('in_progress', 'completed')),
                started_at TEXT NOT NULL,
                finished_at TEXT,
                score_twk INTEGER,
                score_tiu INTEGER,
                score_tkp REAL,
                total_score INTEGER,
                is_passed INTEGER,
                FOREIGN KEY (package_id) REFERENCES packages(id)
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS answers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id INTEGER NOT NULL,
                question_id INTEGER NOT NULL,
                selected_option TEXT NOT NULL CHECK (selected_option IN ('A', 'B', 'C', 'D', 'E')),
                is_correct INTEGER,
                submitted_at TEXT NOT NULL,
                FOREIGN KEY (session_id) REFERENCES sessions(id),
                FOREIGN KEY (question_id) REFERENCES questions(id)
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS study_materials (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    for index in [
        "CREATE INDEX IF NOT EXISTS idx_questions_package_number ON questions (package_id, number, id);",
        "CREATE INDEX IF NOT EXISTS idx_sessions_package_status ON sessions (package_id, status);",
        "CREATE INDEX IF NOT EXISTS idx_sessions_user_started ON sessions (user_id, started_at, id);",
        "CREATE INDEX IF NOT EXISTS idx_answers_session_question_submitted ON answers (session_id, question_id, submitted_at);",
    ] {
        sqlx::query(index).execute(&mut *tx).await?;
    }

    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(1_i64)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(version = 1, "applied schema migration");

    Ok(())
}
