use tryout_core::model::{PackageId, Question, QuestionId};

use super::SqliteRepository;
use super::mapping::{QUESTION_COLUMNS, conn, id_i64, map_question_row};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let [a, b, c, d, e] = question.options().clone();
        let weights = question.weights().map(|w| w.as_array());
        let weight = |i: usize| weights.map(|w| w[i]);

        sqlx::query(
            r"
            INSERT INTO questions (
                id, package_id, number, category, topic, text,
                option_a, option_b, option_c, option_d, option_e, correct_option,
                weight_a, weight_b, weight_c, weight_d, weight_e
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            ON CONFLICT(id) DO UPDATE SET
                package_id = excluded.package_id,
                number = excluded.number,
                category = excluded.category,
                topic = excluded.topic,
                text = excluded.text,
                option_a = excluded.option_a,
                option_b = excluded.option_b,
                option_c = excluded.option_c,
                option_d = excluded.option_d,
                option_e = excluded.option_e,
                correct_option = excluded.correct_option,
                weight_a = excluded.weight_a,
                weight_b = excluded.weight_b,
                weight_c = excluded.weight_c,
                weight_d = excluded.weight_d,
                weight_e = excluded.weight_e
            ",
        )
        .bind(id_i64("question_id", question.id().value())?)
        .bind(id_i64("package_id", question.package_id().value())?)
        .bind(i64::from(question.number()))
        .bind(question.category().as_str())
        .bind(question.topic())
        .bind(question.text())
        .bind(a)
        .bind(b)
        .bind(c)
        .bind(d)
        .bind(e)
        .bind(question.correct_option().map(|o| o.to_string()))
        .bind(weight(0))
        .bind(weight(1))
        .bind(weight(2))
        .bind(weight(3))
        .bind(weight(4))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id_i64("question_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_question_row).transpose()
    }

    async fn questions_for_package(
        &self,
        package_id: PackageId,
    ) -> Result<Vec<Question>, StorageError> {
        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE package_id = ?1 ORDER BY number ASC, id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("package_id", package_id.value())?)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_question_row).collect()
    }
}
