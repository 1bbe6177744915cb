use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tryout_core::model::{
    Answer, AnswerId, AnswerKey, Category, MaterialId, OptionLetter, OptionWeights, Package,
    PackageId, Question, QuestionId, Session, SessionId, SessionScores, SessionStatus,
    StudyMaterial, UserId,
};

use crate::repository::StorageError;

pub(crate) const SESSION_COLUMNS: &str = "id, user_id, package_id, status, started_at, finished_at, \
     score_twk, score_tiu, score_tkp, total_score, is_passed";

pub(crate) const ANSWER_COLUMNS: &str =
    "id, session_id, question_id, selected_option, is_correct, submitted_at";

pub(crate) const QUESTION_COLUMNS: &str = "id, package_id, number, category, topic, text, \
     option_a, option_b, option_c, option_d, option_e, correct_option, \
     weight_a, weight_b, weight_c, weight_d, weight_e";

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn get_i64(row: &SqliteRow, column: &'static str) -> Result<i64, StorageError> {
    row.try_get::<i64, _>(column).map_err(ser)
}

pub(crate) fn parse_option(s: &str) -> Result<OptionLetter, StorageError> {
    OptionLetter::parse(s).map_err(ser)
}

pub(crate) fn bool_to_i64(v: bool) -> i64 {
    i64::from(v)
}

pub(crate) fn map_package_row(row: &SqliteRow) -> Result<Package, StorageError> {
    Package::new(
        PackageId::new(i64_to_u64("package_id", get_i64(row, "id")?)?),
        row.try_get::<String, _>("name").map_err(ser)?,
        u32_from_i64("time_limit_minutes", get_i64(row, "time_limit_minutes")?)?,
    )
    .map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let id = QuestionId::new(i64_to_u64("question_id", get_i64(row, "id")?)?);
    let category = Category::parse(&row.try_get::<String, _>("category").map_err(ser)?).map_err(ser)?;

    let key = if category.is_behavioral() {
        let mut weights = [0.0; 5];
        for (slot, column) in weights
            .iter_mut()
            .zip(["weight_a", "weight_b", "weight_c", "weight_d", "weight_e"])
        {
            *slot = row
                .try_get::<Option<f64>, _>(column)
                .map_err(ser)?
                .ok_or_else(|| StorageError::Serialization(format!("question {id}: missing {column}")))?;
        }
        AnswerKey::Weighted {
            weights: OptionWeights::new(weights).map_err(ser)?,
        }
    } else {
        let raw: Option<String> = row.try_get("correct_option").map_err(ser)?;
        let raw = raw.ok_or_else(|| {
            StorageError::Serialization(format!("question {id}: missing correct_option"))
        })?;
        AnswerKey::Correct {
            option: parse_option(&raw)?,
        }
    };

    let mut options: [String; 5] = Default::default();
    for (slot, column) in options
        .iter_mut()
        .zip(["option_a", "option_b", "option_c", "option_d", "option_e"])
    {
        *slot = row.try_get(column).map_err(ser)?;
    }

    Question::new(
        id,
        PackageId::new(i64_to_u64("package_id", get_i64(row, "package_id")?)?),
        u32_from_i64("number", get_i64(row, "number")?)?,
        category,
        row.try_get::<String, _>("topic").map_err(ser)?,
        row.try_get::<String, _>("text").map_err(ser)?,
        options,
        key,
    )
    .map_err(ser)
}

pub(crate) fn map_session_row(row: &SqliteRow) -> Result<Session, StorageError> {
    let id = SessionId::new(i64_to_u64("session_id", get_i64(row, "id")?)?);
    let status_raw: String = row.try_get("status").map_err(ser)?;
    let status = SessionStatus::parse(&status_raw)
        .ok_or_else(|| StorageError::Serialization(format!("invalid status: {status_raw}")))?;
    let started_at: DateTime<Utc> = row.try_get("started_at").map_err(ser)?;
    let finished_at: Option<DateTime<Utc>> = row.try_get("finished_at").map_err(ser)?;

    let scores = match status {
        SessionStatus::InProgress => None,
        SessionStatus::Completed => {
            let missing = |c: &str| StorageError::Serialization(format!("session {id}: missing {c}"));
            let twk: i64 = row
                .try_get::<Option<i64>, _>("score_twk")
                .map_err(ser)?
                .ok_or_else(|| missing("score_twk"))?;
            let tiu: i64 = row
                .try_get::<Option<i64>, _>("score_tiu")
                .map_err(ser)?
                .ok_or_else(|| missing("score_tiu"))?;
            Some(SessionScores {
                twk: u32_from_i64("score_twk", twk)?,
                tiu: u32_from_i64("score_tiu", tiu)?,
                tkp: row
                    .try_get::<Option<f64>, _>("score_tkp")
                    .map_err(ser)?
                    .ok_or_else(|| missing("score_tkp"))?,
                total: row
                    .try_get::<Option<i64>, _>("total_score")
                    .map_err(ser)?
                    .ok_or_else(|| missing("total_score"))?,
                is_passed: row
                    .try_get::<Option<i64>, _>("is_passed")
                    .map_err(ser)?
                    .ok_or_else(|| missing("is_passed"))?
                    != 0,
            })
        }
    };

    Session::from_persisted(
        id,
        UserId::new(i64_to_u64("user_id", get_i64(row, "user_id")?)?),
        PackageId::new(i64_to_u64("package_id", get_i64(row, "package_id")?)?),
        status,
        started_at,
        finished_at,
        scores,
    )
    .map_err(ser)
}

pub(crate) fn map_answer_row(row: &SqliteRow) -> Result<Answer, StorageError> {
    let selected: String = row.try_get("selected_option").map_err(ser)?;
    Ok(Answer {
        id: AnswerId::new(i64_to_u64("answer_id", get_i64(row, "id")?)?),
        session_id: SessionId::new(i64_to_u64("session_id", get_i64(row, "session_id")?)?),
        question_id: QuestionId::new(i64_to_u64("question_id", get_i64(row, "question_id")?)?),
        selected: parse_option(&selected)?,
        is_correct: row
            .try_get::<Option<i64>, _>("is_correct")
            .map_err(ser)?
            .map(|v| v != 0),
        submitted_at: row.try_get("submitted_at").map_err(ser)?,
    })
}

pub(crate) fn map_material_row(row: &SqliteRow) -> Result<StudyMaterial, StorageError> {
    Ok(StudyMaterial::new(
        MaterialId::new(i64_to_u64("material_id", get_i64(row, "id")?)?),
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
    ))
}
