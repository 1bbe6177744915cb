//! Reduces a session's answers into frozen per-category scores.
//!
//! Everything here is a pure function of the question set, the answer rows and
//! the [`ScoringRules`]; running it twice on the same input yields the same
//! [`SessionScores`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ValidationError;
use crate::model::{Answer, Category, Question, QuestionId, SessionScores, latest_per_question};

//
// ─── RULES ─────────────────────────────────────────────────────────────────────
//

/// Scoring configuration: credit per correct objective item and pass thresholds.
///
/// A session passes only when every category subtotal is strictly greater than
/// its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub credit_per_item: u32,
    pub passing_twk: f64,
    pub passing_tiu: f64,
    pub passing_tkp: f64,
    /// Denominator used by mastery when every option of a behavioral question weighs zero.
    pub behavioral_weight_ceiling: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            credit_per_item: 5,
            passing_twk: 65.0,
            passing_tiu: 80.0,
            passing_tkp: 166.0,
            behavioral_weight_ceiling: 5.0,
        }
    }
}

impl ScoringRules {
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRule` naming the first bad field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.credit_per_item == 0 {
            return Err(ValidationError::InvalidRule {
                field: "credit_per_item",
            });
        }
        for (field, value) in [
            ("passing_twk", self.passing_twk),
            ("passing_tiu", self.passing_tiu),
            ("passing_tkp", self.passing_tkp),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::InvalidRule { field });
            }
        }
        if !self.behavioral_weight_ceiling.is_finite() || self.behavioral_weight_ceiling <= 0.0 {
            return Err(ValidationError::InvalidRule {
                field: "behavioral_weight_ceiling",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn threshold(&self, category: Category) -> f64 {
        match category {
            Category::Twk => self.passing_twk,
            Category::Tiu => self.passing_tiu,
            Category::Tkp => self.passing_tkp,
        }
    }
}

//
// ─── QUESTION INDEX ────────────────────────────────────────────────────────────
//

/// Questions of one package keyed by id.
#[derive(Debug, Clone, Default)]
pub struct QuestionIndex {
    by_id: HashMap<QuestionId, Question>,
}

impl QuestionIndex {
    #[must_use]
    pub fn new(questions: impl IntoIterator<Item = Question>) -> Self {
        Self {
            by_id: questions.into_iter().map(|q| (q.id(), q)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.by_id.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.by_id
            .values()
            .filter(|q| q.category() == category)
            .count()
    }
}

//
// ─── SCORE SHEET ───────────────────────────────────────────────────────────────
//

/// Per-category tally behind a session's scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub answered: u32,
    /// `None` for the behavioral category.
    pub correct: Option<u32>,
    pub points: f64,
    pub threshold: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub scores: SessionScores,
    pub breakdown: Vec<CategoryBreakdown>,
}

#[derive(Default)]
struct Tally {
    answered: u32,
    correct: u32,
    points: f64,
}

/// Scores one session's answers against its package.
///
/// Only the latest answer per question counts. Objective categories earn
/// `credit_per_item` per correct answer with no penalty; the behavioral
/// category earns the weight of exactly the option chosen. Answers whose
/// question is not in `questions` contribute nothing.
#[must_use]
pub fn score_answers(questions: &QuestionIndex, answers: &[Answer], rules: &ScoringRules) -> ScoreSheet {
    let mut twk = Tally::default();
    let mut tiu = Tally::default();
    let mut tkp = Tally::default();

    for answer in latest_per_question(answers) {
        let Some(question) = questions.get(answer.question_id) else {
            continue;
        };
        let tally = match question.category() {
            Category::Twk => &mut twk,
            Category::Tiu => &mut tiu,
            Category::Tkp => &mut tkp,
        };
        tally.answered += 1;

        if let Some(weight) = question.weight_of(answer.selected) {
            tally.points += weight;
        } else if question.check(answer.selected) == Some(true) {
            tally.correct += 1;
        }
    }

    let twk_score = twk.correct.saturating_mul(rules.credit_per_item);
    let tiu_score = tiu.correct.saturating_mul(rules.credit_per_item);
    let tkp_score = tkp.points;

    let twk_passed = f64::from(twk_score) > rules.passing_twk;
    let tiu_passed = f64::from(tiu_score) > rules.passing_tiu;
    let tkp_passed = tkp_score > rules.passing_tkp;

    #[allow(clippy::cast_possible_truncation)]
    let total = (f64::from(twk_score) + f64::from(tiu_score) + tkp_score).round() as i64;

    let scores = SessionScores {
        twk: twk_score,
        tiu: tiu_score,
        tkp: tkp_score,
        total,
        is_passed: twk_passed && tiu_passed && tkp_passed,
    };

    let breakdown = vec![
        CategoryBreakdown {
            category: Category::Twk,
            answered: twk.answered,
            correct: Some(twk.correct),
            points: f64::from(twk_score),
            threshold: rules.passing_twk,
            passed: twk_passed,
        },
        CategoryBreakdown {
            category: Category::Tiu,
            answered: tiu.answered,
            correct: Some(tiu.correct),
            points: f64::from(tiu_score),
            threshold: rules.passing_tiu,
            passed: tiu_passed,
        },
        CategoryBreakdown {
            category: Category::Tkp,
            answered: tkp.answered,
            correct: None,
            points: tkp_score,
            threshold: rules.passing_tkp,
            passed: tkp_passed,
        },
    ];

    ScoreSheet { scores, breakdown }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
