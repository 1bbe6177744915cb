use tryout_core::model::{Answer, AnswerDraft, AnswerId, SessionId, UserId};

use super::SqliteRepository;
use super::mapping::{ANSWER_COLUMNS, bool_to_i64, conn, id_i64, map_answer_row};
use crate::repository::{AnswerRepository, StorageError};

#[async_trait::async_trait]
impl AnswerRepository for SqliteRepository {
    async fn append_answer(&self, draft: AnswerDraft) -> Result<Answer, StorageError> {
        let session_id = id_i64("session_id", draft.session_id.value())?;

        // The status guard and the insert are one statement, so an append can
        // never land after the session's finish commits.
        let res = sqlx::query(
            r"
                INSERT INTO answers (session_id, question_id, selected_option, is_correct, submitted_at)
                SELECT ?1, ?2, ?3, ?4, ?5
                WHERE EXISTS (
                    SELECT 1 FROM sessions WHERE id = ?1 AND status = 'in_progress'
                )
            ",
        )
        .bind(session_id)
        .bind(id_i64("question_id", draft.question_id.value())?)
        .bind(draft.selected.to_string())
        .bind(draft.is_correct.map(bool_to_i64))
        .bind(draft.submitted_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(self.session_write_error(session_id).await);
        }

        let id = u64::try_from(res.last_insert_rowid())
            .map_err(|_| StorageError::Serialization("answer id sign overflow".into()))?;
        Ok(Answer::from_draft(AnswerId::new(id), draft))
    }

    async fn answers_for_session(&self, session_id: SessionId) -> Result<Vec<Answer>, StorageError> {
        let sql = format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE session_id = ?1 ORDER BY submitted_at ASC, id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("session_id", session_id.value())?)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_answer_row).collect()
    }

    async fn answers_for_user(&self, user_id: UserId) -> Result<Vec<Answer>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT a.id, a.session_id, a.question_id, a.selected_option, a.is_correct, a.submitted_at
                FROM answers a
                JOIN sessions s ON s.id = a.session_id
                WHERE s.user_id = ?1
                ORDER BY a.submitted_at ASC, a.id ASC
            ",
        )
        .bind(id_i64("user_id", user_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_answer_row).collect()
    }
}
