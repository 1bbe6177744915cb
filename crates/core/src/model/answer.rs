use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::{AnswerId, QuestionId, SessionId};
use crate::model::option::OptionLetter;

/// A submission about to be appended; storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerDraft {
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub selected: OptionLetter,
    pub is_correct: Option<bool>,
    pub submitted_at: DateTime<Utc>,
}

/// One stored submission. Rows are append-only; resubmissions add new rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub selected: OptionLetter,
    /// Only meaningful for objective categories.
    pub is_correct: Option<bool>,
    pub submitted_at: DateTime<Utc>,
}

impl Answer {
    #[must_use]
    pub fn from_draft(id: AnswerId, draft: AnswerDraft) -> Self {
        Self {
            id,
            session_id: draft.session_id,
            question_id: draft.question_id,
            selected: draft.selected,
            is_correct: draft.is_correct,
            submitted_at: draft.submitted_at,
        }
    }

    /// Ordering used to pick the authoritative row: later `submitted_at`,
    /// then the later insert.
    fn supersedes(&self, other: &Answer) -> bool {
        (self.submitted_at, self.id) > (other.submitted_at, other.id)
    }
}

/// Keeps only the authoritative answer per (session, question).
///
/// Output is ordered by session id, then question id.
#[must_use]
pub fn latest_per_question(answers: &[Answer]) -> Vec<&Answer> {
    let mut latest: HashMap<(SessionId, QuestionId), &Answer> = HashMap::new();
    for answer in answers {
        latest
            .entry((answer.session_id, answer.question_id))
            .and_modify(|current| {
                if answer.supersedes(current) {
                    *current = answer;
                }
            })
            .or_insert(answer);
    }

    let mut out: Vec<_> = latest.into_values().collect();
    out.sort_by_key(|a| (a.session_id, a.question_id));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn answer(id: u64, question: u64, option: OptionLetter, offset_secs: i64) -> Answer {
        Answer {
            id: AnswerId::new(id),
            session_id: SessionId::new(1),
            question_id: QuestionId::new(question),
            selected: option,
            is_correct: None,
            submitted_at: fixed_now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn latest_submission_wins_per_question() {
        let rows = vec![
            answer(1, 10, OptionLetter::A, 0),
            answer(2, 11, OptionLetter::B, 5),
            answer(3, 10, OptionLetter::C, 30),
            answer(4, 10, OptionLetter::D, 10),
        ];

        let latest = latest_per_question(&rows);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].question_id, QuestionId::new(10));
        assert_eq!(latest[0].selected, OptionLetter::C);
        assert_eq!(latest[1].selected, OptionLetter::B);
    }

    #[test]
    fn equal_timestamps_fall_back_to_later_insert() {
        let rows = vec![
            answer(9, 10, OptionLetter::E, 0),
            answer(8, 10, OptionLetter::A, 0),
        ];
        let latest = latest_per_question(&rows);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id, AnswerId::new(9));
    }

    #[test]
    fn sessions_are_kept_apart() {
        let mut other = answer(5, 10, OptionLetter::B, 0);
        other.session_id = SessionId::new(2);
        let rows = vec![answer(1, 10, OptionLetter::A, 100), other];

        let latest = latest_per_question(&rows);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[1].session_id, SessionId::new(2));
    }
}
