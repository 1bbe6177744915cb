//! Leaderboard over completed sessions: one entry per user, best attempt only.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{Session, SessionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub total_score: i64,
    /// Whole seconds between start and finish; `None` when the finish stamp is missing.
    pub duration_secs: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ranking {
    pub entries: Vec<RankingEntry>,
    /// Distinct users with at least one completed session.
    pub participant_count: usize,
}

/// Orders sessions best-first: higher total score, then shorter duration, then
/// lower session id. A missing duration sorts after every known one.
#[must_use]
pub fn compare_attempts(a: &Session, b: &Session) -> Ordering {
    let score_a = a.total_score().unwrap_or(i64::MIN);
    let score_b = b.total_score().unwrap_or(i64::MIN);
    score_b
        .cmp(&score_a)
        .then_with(|| cmp_duration(a.duration(), b.duration()))
        .then_with(|| a.id().cmp(&b.id()))
}

fn cmp_duration(a: Option<Duration>, b: Option<Duration>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Builds the leaderboard for one package.
///
/// Sessions that are not completed are ignored. Each user contributes their
/// single best session under [`compare_attempts`]; the survivors are sorted by
/// the same order and ranked from 1.
#[must_use]
pub fn rank_sessions<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> Ranking {
    let mut best: HashMap<UserId, &Session> = HashMap::new();
    for session in sessions.into_iter().filter(|s| s.is_completed()) {
        best.entry(session.user_id())
            .and_modify(|current| {
                if compare_attempts(session, current) == Ordering::Less {
                    *current = session;
                }
            })
            .or_insert(session);
    }

    let mut winners: Vec<&Session> = best.into_values().collect();
    winners.sort_by(|a, b| compare_attempts(a, b));

    let entries: Vec<RankingEntry> = winners
        .iter()
        .zip(1_u32..)
        .map(|(session, rank)| RankingEntry {
            rank,
            session_id: session.id(),
            user_id: session.user_id(),
            total_score: session.total_score().unwrap_or_default(),
            duration_secs: session.duration().map(|d| d.num_seconds()),
        })
        .collect();

    Ranking {
        participant_count: entries.len(),
        entries,
    }
}
