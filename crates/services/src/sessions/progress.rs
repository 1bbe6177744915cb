use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use tryout_core::model::{Answer, Package, Session, SessionId, SessionStatus, latest_per_question};
use tryout_core::scoring::QuestionIndex;

/// Aggregated view of an attempt's progress.
///
/// The deadline is informational; it never blocks submission or finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub deadline: DateTime<Utc>,
    pub is_expired: bool,
}

impl SessionProgress {
    pub(crate) fn compute(
        session: &Session,
        package: &Package,
        questions: &QuestionIndex,
        answers: &[Answer],
        now: DateTime<Utc>,
    ) -> Self {
        let answered = latest_per_question(answers)
            .into_iter()
            .filter(|a| a.session_id == session.id() && questions.get(a.question_id).is_some())
            .count();
        let total = questions.len();
        let deadline =
            session.started_at() + Duration::minutes(i64::from(package.time_limit_minutes()));

        Self {
            session_id: session.id(),
            status: session.status(),
            total,
            answered,
            remaining: total.saturating_sub(answered),
            deadline,
            is_expired: now > deadline,
        }
    }

    /// Every question of the package has an answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}
