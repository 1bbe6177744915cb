use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::ids::{PackageId, QuestionId};
use crate::model::option::{Category, OptionLetter};

//
// ─── OPTION WEIGHTS ───────────────────────────────────────────────────────────
//

/// Per-option point weights for a behavioral question, indexed A..E.
///
/// Weights are non-negative and need not be monotonic across letters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionWeights([f64; 5]);

impl OptionWeights {
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidWeight` if any weight is negative or non-finite.
    pub fn new(weights: [f64; 5]) -> Result<Self, ValidationError> {
        for w in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(ValidationError::InvalidWeight(w.to_string()));
            }
        }
        Ok(Self(weights))
    }

    #[must_use]
    pub fn weight(&self, option: OptionLetter) -> f64 {
        self.0[option.index()]
    }

    /// Largest weight among the five options.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }

    #[must_use]
    pub fn as_array(&self) -> [f64; 5] {
        self.0
    }
}

//
// ─── ANSWER KEY ───────────────────────────────────────────────────────────────
//

/// How a question is marked: one right option, or a weight per option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AnswerKey {
    Correct { option: OptionLetter },
    Weighted { weights: OptionWeights },
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A catalog question. Immutable once a package references it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    package_id: PackageId,
    number: u32,
    category: Category,
    topic: String,
    text: String,
    options: [String; 5],
    key: AnswerKey,
}

impl Question {
    /// Builds a question, checking that the answer key matches the category.
    ///
    /// An empty `topic` falls back to the category label.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingCorrectOption` for an objective question keyed
    /// by weights, and `ValidationError::MissingWeights` for a behavioral question
    /// keyed by a single option.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestionId,
        package_id: PackageId,
        number: u32,
        category: Category,
        topic: impl Into<String>,
        text: impl Into<String>,
        options: [String; 5],
        key: AnswerKey,
    ) -> Result<Self, ValidationError> {
        match (category.is_behavioral(), &key) {
            (false, AnswerKey::Weighted { .. }) => {
                return Err(ValidationError::MissingCorrectOption(id.value()));
            }
            (true, AnswerKey::Correct { .. }) => {
                return Err(ValidationError::MissingWeights(id.value()));
            }
            _ => {}
        }

        let topic = topic.into();
        let topic = if topic.trim().is_empty() {
            category.as_str().to_owned()
        } else {
            topic.trim().to_owned()
        };

        Ok(Self {
            id,
            package_id,
            number,
            category,
            topic,
            text: text.into(),
            options,
            key,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn package_id(&self) -> PackageId {
        self.package_id
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; 5] {
        &self.options
    }

    #[must_use]
    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    #[must_use]
    pub fn correct_option(&self) -> Option<OptionLetter> {
        match self.key {
            AnswerKey::Correct { option } => Some(option),
            AnswerKey::Weighted { .. } => None,
        }
    }

    #[must_use]
    pub fn weights(&self) -> Option<&OptionWeights> {
        match &self.key {
            AnswerKey::Weighted { weights } => Some(weights),
            AnswerKey::Correct { .. } => None,
        }
    }

    /// Right/wrong verdict for objective questions, `None` for behavioral ones.
    #[must_use]
    pub fn check(&self, selected: OptionLetter) -> Option<bool> {
        self.correct_option().map(|correct| correct == selected)
    }

    /// Points earned by `selected` on a behavioral question, `None` for objective ones.
    #[must_use]
    pub fn weight_of(&self, selected: OptionLetter) -> Option<f64> {
        self.weights().map(|w| w.weight(selected))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; 5] {
        ["a", "b", "c", "d", "e"].map(String::from)
    }

    #[test]
    fn objective_question_checks_selected_option() {
        let q = Question::new(
            QuestionId::new(1),
            PackageId::new(1),
            1,
            Category::Twk,
            "Pancasila",
            "Q",
            options(),
            AnswerKey::Correct {
                option: OptionLetter::B,
            },
        )
        .unwrap();

        assert_eq!(q.check(OptionLetter::B), Some(true));
        assert_eq!(q.check(OptionLetter::A), Some(false));
        assert_eq!(q.weight_of(OptionLetter::B), None);
    }

    #[test]
    fn behavioral_question_reports_selected_weight() {
        let weights = OptionWeights::new([4.0, 2.0, 5.0, 1.0, 3.0]).unwrap();
        let q = Question::new(
            QuestionId::new(2),
            PackageId::new(1),
            2,
            Category::Tkp,
            "",
            "Q",
            options(),
            AnswerKey::Weighted { weights },
        )
        .unwrap();

        assert_eq!(q.check(OptionLetter::C), None);
        assert_eq!(q.weight_of(OptionLetter::C), Some(5.0));
        assert_eq!(q.weights().unwrap().max(), 5.0);
        assert_eq!(q.topic(), "TKP");
    }

    #[test]
    fn key_must_match_category() {
        let weights = OptionWeights::new([1.0; 5]).unwrap();
        let err = Question::new(
            QuestionId::new(3),
            PackageId::new(1),
            3,
            Category::Tiu,
            "Numbers",
            "Q",
            options(),
            AnswerKey::Weighted { weights },
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingCorrectOption(3));

        let err = Question::new(
            QuestionId::new(4),
            PackageId::new(1),
            4,
            Category::Tkp,
            "Service",
            "Q",
            options(),
            AnswerKey::Correct {
                option: OptionLetter::A,
            },
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingWeights(4));
    }

    #[test]
    fn negative_or_nan_weights_are_rejected() {
        assert!(OptionWeights::new([1.0, -1.0, 0.0, 0.0, 0.0]).is_err());
        assert!(OptionWeights::new([f64::NAN, 1.0, 0.0, 0.0, 0.0]).is_err());
        assert_eq!(OptionWeights::new([0.0; 5]).unwrap().max(), 0.0);
    }
}
