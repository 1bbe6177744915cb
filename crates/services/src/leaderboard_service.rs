use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use storage::repository::{PackageRepository, SessionRepository};
use tryout_core::model::{PackageId, Session, SessionId};
use tryout_core::percentile::percentile;
use tryout_core::ranking::{Ranking, rank_sessions};

use crate::error::AssessmentError;

/// Standing of one completed session among every completed attempt on its
/// package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PercentileReport {
    pub session_id: SessionId,
    pub package_id: PackageId,
    pub total_score: i64,
    pub percentile: Option<u8>,
    /// Completed attempts considered, repeat attempts included.
    pub sample_size: usize,
}

/// Read-only leaderboard queries over completed sessions.
#[derive(Clone)]
pub struct LeaderboardService {
    packages: Arc<dyn PackageRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(packages: Arc<dyn PackageRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { packages, sessions }
    }

    /// Best attempt per user, ordered by score then duration.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` for an unknown package.
    #[instrument(skip(self))]
    pub async fn get_ranking(&self, package_id: PackageId) -> Result<Ranking, AssessmentError> {
        if self.packages.get_package(package_id).await?.is_none() {
            return Err(AssessmentError::NotFound("package"));
        }
        let completed = self.sessions.completed_sessions_for_package(package_id).await?;
        Ok(rank_sessions(&completed))
    }

    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` for an unknown session and
    /// `AssessmentError::InvalidState` while it is still in progress.
    #[instrument(skip(self))]
    pub async fn get_percentile(
        &self,
        session_id: SessionId,
    ) -> Result<PercentileReport, AssessmentError> {
        let session = self
            .sessions
            .get_session(session_id)
            .await?
            .ok_or(AssessmentError::NotFound("session"))?;
        let total_score = session.total_score().ok_or_else(|| {
            AssessmentError::InvalidState("session is still in progress".into())
        })?;

        let scores: Vec<i64> = self
            .sessions
            .completed_sessions_for_package(session.package_id())
            .await?
            .iter()
            .filter_map(Session::total_score)
            .collect();

        Ok(PercentileReport {
            session_id,
            package_id: session.package_id(),
            total_score,
            percentile: percentile(total_score, &scores),
            sample_size: scores.len(),
        })
    }
}
