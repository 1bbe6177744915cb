use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::{PackageId, SessionId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("session {0} is already completed")]
    AlreadyCompleted(SessionId),

    #[error("finished_at is before started_at")]
    InvalidTimeRange,

    #[error("completed session {0} has no scores")]
    MissingScores(SessionId),

    #[error("in-progress session {0} carries completion data")]
    UnexpectedScores(SessionId),
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of one attempt. The only transition is `InProgress` → `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── SCORES ────────────────────────────────────────────────────────────────────
//

/// Frozen result of a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionScores {
    pub twk: u32,
    pub tiu: u32,
    pub tkp: f64,
    pub total: i64,
    pub is_passed: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One user's attempt at a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    package_id: PackageId,
    status: SessionStatus,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    scores: Option<SessionScores>,
}

impl Session {
    /// A fresh attempt in `InProgress`.
    #[must_use]
    pub fn start(
        id: SessionId,
        user_id: UserId,
        package_id: PackageId,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            package_id,
            status: SessionStatus::InProgress,
            started_at,
            finished_at: None,
            scores: None,
        }
    }

    /// Rehydrate a session from persisted storage.
    ///
    /// A completed session must carry scores; `finished_at` may be missing on
    /// legacy rows and is then treated as an unbounded duration by ranking.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` if status, timestamps and scores disagree.
    pub fn from_persisted(
        id: SessionId,
        user_id: UserId,
        package_id: PackageId,
        status: SessionStatus,
        started_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
        scores: Option<SessionScores>,
    ) -> Result<Self, SessionStateError> {
        if finished_at.is_some_and(|f| f < started_at) {
            return Err(SessionStateError::InvalidTimeRange);
        }
        match status {
            SessionStatus::Completed if scores.is_none() => {
                return Err(SessionStateError::MissingScores(id));
            }
            SessionStatus::InProgress if scores.is_some() || finished_at.is_some() => {
                return Err(SessionStateError::UnexpectedScores(id));
            }
            _ => {}
        }
        Ok(Self {
            id,
            user_id,
            package_id,
            status,
            started_at,
            finished_at,
            scores,
        })
    }

    /// Freeze `scores` and move to `Completed`. Happens exactly once.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::AlreadyCompleted` on a second call and
    /// `SessionStateError::InvalidTimeRange` if `finished_at` precedes the start.
    pub fn complete(
        &mut self,
        scores: SessionScores,
        finished_at: DateTime<Utc>,
    ) -> Result<(), SessionStateError> {
        if self.status == SessionStatus::Completed {
            return Err(SessionStateError::AlreadyCompleted(self.id));
        }
        if finished_at < self.started_at {
            return Err(SessionStateError::InvalidTimeRange);
        }
        self.status = SessionStatus::Completed;
        self.finished_at = Some(finished_at);
        self.scores = Some(scores);
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn package_id(&self) -> PackageId {
        self.package_id
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn scores(&self) -> Option<&SessionScores> {
        self.scores.as_ref()
    }

    #[must_use]
    pub fn total_score(&self) -> Option<i64> {
        self.scores.map(|s| s.total)
    }

    /// Time between start and finish, if the session was stamped on finish.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at.map(|f| f - self.started_at)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn scores(total: i64) -> SessionScores {
        SessionScores {
            twk: 0,
            tiu: 0,
            tkp: 0.0,
            total,
            is_passed: false,
        }
    }

    fn session() -> Session {
        Session::start(
            SessionId::new(1),
            UserId::new(7),
            PackageId::new(3),
            fixed_now(),
        )
    }

    #[test]
    fn complete_transitions_once() {
        let mut s = session();
        assert_eq!(s.status(), SessionStatus::InProgress);
        assert_eq!(s.duration(), None);

        let end = fixed_now() + Duration::minutes(40);
        s.complete(scores(300), end).unwrap();
        assert!(s.is_completed());
        assert_eq!(s.finished_at(), Some(end));
        assert_eq!(s.duration(), Some(Duration::minutes(40)));

        let err = s.complete(scores(999), end).unwrap_err();
        assert_eq!(err, SessionStateError::AlreadyCompleted(SessionId::new(1)));
        assert_eq!(s.total_score(), Some(300));
    }

    #[test]
    fn complete_rejects_finish_before_start() {
        let mut s = session();
        let err = s
            .complete(scores(1), fixed_now() - Duration::seconds(1))
            .unwrap_err();
        assert_eq!(err, SessionStateError::InvalidTimeRange);
        assert_eq!(s.status(), SessionStatus::InProgress);
    }

    #[test]
    fn from_persisted_checks_consistency() {
        let now = fixed_now();
        let id = SessionId::new(5);
        let user = UserId::new(1);
        let pkg = PackageId::new(1);

        let err = Session::from_persisted(id, user, pkg, SessionStatus::Completed, now, Some(now), None)
            .unwrap_err();
        assert_eq!(err, SessionStateError::MissingScores(id));

        let err = Session::from_persisted(
            id,
            user,
            pkg,
            SessionStatus::InProgress,
            now,
            None,
            Some(scores(1)),
        )
        .unwrap_err();
        assert_eq!(err, SessionStateError::UnexpectedScores(id));

        let legacy =
            Session::from_persisted(id, user, pkg, SessionStatus::Completed, now, None, Some(scores(1)))
                .unwrap();
        assert_eq!(legacy.duration(), None);
    }

    #[test]
    fn status_labels_round_trip() {
        for status in [SessionStatus::InProgress, SessionStatus::Completed] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::parse("abandoned"), None);
    }
}
