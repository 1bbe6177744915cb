use chrono::{DateTime, Utc};
use tryout_core::model::{Answer, PackageId, Session, SessionId, UserId};

use super::SqliteRepository;
use super::mapping::{
    ANSWER_COLUMNS, SESSION_COLUMNS, bool_to_i64, conn, id_i64, map_answer_row, map_session_row,
};
use crate::repository::{NewSession, Scorer, SessionRepository, StorageError};

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn insert_session(&self, new: NewSession) -> Result<Session, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO sessions (user_id, package_id, status, started_at)
                VALUES (?1, ?2, 'in_progress', ?3)
            ",
        )
        .bind(id_i64("user_id", new.user_id.value())?)
        .bind(id_i64("package_id", new.package_id.value())?)
        .bind(new.started_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        let id = u64::try_from(res.last_insert_rowid())
            .map_err(|_| StorageError::Serialization("session id sign overflow".into()))?;
        Ok(Session::start(
            SessionId::new(id),
            new.user_id,
            new.package_id,
            new.started_at,
        ))
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<Session>, StorageError> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id_i64("session_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_session_row).transpose()
    }

    async fn completed_sessions_for_package(
        &self,
        package_id: PackageId,
    ) -> Result<Vec<Session>, StorageError> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions \
             WHERE package_id = ?1 AND status = 'completed' ORDER BY id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("package_id", package_id.value())?)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_session_row).collect()
    }

    async fn sessions_for_user(&self, user_id: UserId) -> Result<Vec<Session>, StorageError> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = ?1 ORDER BY started_at ASC, id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("user_id", user_id.value())?)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_session_row).collect()
    }

    async fn finish_session(
        &self,
        id: SessionId,
        finished_at: DateTime<Utc>,
        scorer: &Scorer<'_>,
    ) -> Result<Session, StorageError> {
        let session_id = id_i64("session_id", id.value())?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        // Write first so this transaction holds the database write lock before
        // reading answers; concurrent appends wait and then see `completed`.
        let claimed = sqlx::query(
            "UPDATE sessions SET status = status WHERE id = ?1 AND status = 'in_progress'",
        )
        .bind(session_id)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await.map_err(conn)?;
            return Err(self.session_write_error(session_id).await);
        }

        let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(session_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(conn)?;
        let mut session = map_session_row(&row)?;

        let sql = format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE session_id = ?1 ORDER BY submitted_at ASC, id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(session_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(conn)?;
        let answers = rows.iter().map(map_answer_row).collect::<Result<Vec<Answer>, _>>()?;

        let scores = scorer(&session, &answers);
        session
            .complete(scores, finished_at)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        sqlx::query(
            r"
                UPDATE sessions SET
                    status = 'completed',
                    finished_at = ?2,
                    score_twk = ?3,
                    score_tiu = ?4,
                    score_tkp = ?5,
                    total_score = ?6,
                    is_passed = ?7
                WHERE id = ?1
            ",
        )
        .bind(session_id)
        .bind(finished_at)
        .bind(i64::from(scores.twk))
        .bind(i64::from(scores.tiu))
        .bind(scores.tkp)
        .bind(scores.total)
        .bind(bool_to_i64(scores.is_passed))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        Ok(session)
    }
}
