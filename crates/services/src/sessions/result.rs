use chrono::{DateTime, Utc};
use serde::Serialize;

use tryout_core::model::{Category, PackageId, Session, SessionId, SessionScores, UserId};
use tryout_core::scoring::CategoryBreakdown;

use crate::error::AssessmentError;

/// Per-category view of a completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryResult {
    pub category: Category,
    pub answered: u32,
    /// `None` for the behavioral category.
    pub correct: Option<u32>,
    pub points: f64,
}

/// Frozen outcome of a completed attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResult {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub package_id: PackageId,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_secs: Option<i64>,
    pub scores: SessionScores,
    pub breakdown: Vec<CategoryResult>,
}

fn frozen_points(scores: &SessionScores, category: Category) -> f64 {
    match category {
        Category::Twk => f64::from(scores.twk),
        Category::Tiu => f64::from(scores.tiu),
        Category::Tkp => scores.tkp,
    }
}

impl SessionResult {
    /// Scores and points come from the session row. Only the answered and
    /// correct counts are taken from `tallies`, so later changes to the
    /// scoring rules never show up in a finished result.
    pub(crate) fn from_completed(
        session: &Session,
        tallies: &[CategoryBreakdown],
    ) -> Result<Self, AssessmentError> {
        let scores = session
            .scores()
            .copied()
            .ok_or_else(|| AssessmentError::InvalidState("session is still in progress".into()))?;
        let breakdown = tallies
            .iter()
            .map(|tally| CategoryResult {
                category: tally.category,
                answered: tally.answered,
                correct: tally.correct,
                points: frozen_points(&scores, tally.category),
            })
            .collect();
        Ok(Self {
            session_id: session.id(),
            user_id: session.user_id(),
            package_id: session.package_id(),
            started_at: session.started_at(),
            finished_at: session.finished_at(),
            duration_secs: session.duration().map(|d| d.num_seconds()),
            scores,
            breakdown,
        })
    }

    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.scores.is_passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tryout_core::time::fixed_now;

    fn tally(category: Category, answered: u32, correct: Option<u32>, points: f64) -> CategoryBreakdown {
        CategoryBreakdown {
            category,
            answered,
            correct,
            points,
            threshold: 1000.0,
            passed: false,
        }
    }

    #[test]
    fn points_follow_the_stored_scores() {
        let mut session =
            Session::start(SessionId::new(1), UserId::new(1), PackageId::new(1), fixed_now());
        let frozen = SessionScores {
            twk: 10,
            tiu: 5,
            tkp: 4.0,
            total: 19,
            is_passed: false,
        };
        session.complete(frozen, fixed_now()).unwrap();

        // Tallies rescored with a doubled credit.
        let tallies = [
            tally(Category::Twk, 3, Some(2), 20.0),
            tally(Category::Tiu, 1, Some(1), 10.0),
            tally(Category::Tkp, 1, None, 4.0),
        ];
        let result = SessionResult::from_completed(&session, &tallies).unwrap();

        let points: Vec<f64> = result.breakdown.iter().map(|b| b.points).collect();
        assert_eq!(points, vec![10.0, 5.0, 4.0]);
        assert_eq!(result.breakdown[0].answered, 3);
        assert_eq!(result.breakdown[0].correct, Some(2));
        assert_eq!(result.scores, frozen);
    }

    #[test]
    fn in_progress_sessions_have_no_result() {
        let session =
            Session::start(SessionId::new(1), UserId::new(1), PackageId::new(1), fixed_now());
        let err = SessionResult::from_completed(&session, &[]).unwrap_err();
        assert!(matches!(err, AssessmentError::InvalidState(_)));
    }
}
