use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{Category, OptionLetter, Question};

/// What one authoritative answer tells us about a topic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Objective { correct: bool },
    /// `possible` is the best weight on offer; zero means "use the ceiling".
    Behavioral { earned: f64, possible: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasteryObservation {
    pub topic: String,
    pub category: Category,
    pub outcome: Outcome,
}

impl MasteryObservation {
    #[must_use]
    pub fn from_answer(question: &Question, selected: OptionLetter) -> Self {
        let outcome = match question.weights() {
            Some(weights) => Outcome::Behavioral {
                earned: weights.weight(selected),
                possible: weights.max(),
            },
            None => Outcome::Objective {
                correct: question.check(selected) == Some(true),
            },
        };
        Self {
            topic: question.topic().to_owned(),
            category: question.category(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMastery {
    pub topic: String,
    pub category: Category,
    pub attempts: u32,
    /// For behavioral topics: answers that picked the top-weighted option.
    pub correct: u32,
    pub accuracy: u8,
}

#[derive(Default)]
struct Acc {
    attempts: u32,
    correct: u32,
    earned: f64,
    possible: f64,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pct(num: f64, den: f64) -> u8 {
    if den <= 0.0 {
        return 0;
    }
    (100.0 * num / den).round().clamp(0.0, 100.0) as u8
}

/// Groups observations by (category, topic) and computes accuracy.
///
/// Objective topics: `round(100 * correct / attempts)`. Behavioral topics:
/// `round(100 * sum(earned) / sum(possible))`, where a question whose options
/// all weigh zero counts `ceiling` as its possible weight.
#[must_use]
pub fn topic_mastery(observations: &[MasteryObservation], ceiling: f64) -> Vec<TopicMastery> {
    let mut groups: BTreeMap<(Category, &str), Acc> = BTreeMap::new();

    for obs in observations {
        let acc = groups.entry((obs.category, obs.topic.as_str())).or_default();
        acc.attempts += 1;
        match obs.outcome {
            Outcome::Objective { correct } => {
                if correct {
                    acc.correct += 1;
                }
            }
            Outcome::Behavioral { earned, possible } => {
                let possible = if possible > 0.0 { possible } else { ceiling };
                if earned >= possible {
                    acc.correct += 1;
                }
                acc.earned += earned;
                acc.possible += possible;
            }
        }
    }

    groups
        .into_iter()
        .map(|((category, topic), acc)| {
            let accuracy = if category.is_behavioral() {
                pct(acc.earned, acc.possible)
            } else {
                pct(f64::from(acc.correct), f64::from(acc.attempts))
            };
            TopicMastery {
                topic: topic.to_owned(),
                category,
                attempts: acc.attempts,
                correct: acc.correct,
                accuracy,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objective(topic: &str, correct: bool) -> MasteryObservation {
        MasteryObservation {
            topic: topic.into(),
            category: Category::Tiu,
            outcome: Outcome::Objective { correct },
        }
    }

    fn behavioral(topic: &str, earned: f64, possible: f64) -> MasteryObservation {
        MasteryObservation {
            topic: topic.into(),
            category: Category::Tkp,
            outcome: Outcome::Behavioral { earned, possible },
        }
    }

    #[test]
    fn objective_accuracy_is_rounded_ratio() {
        let obs = vec![
            objective("Deret", true),
            objective("Deret", false),
            objective("Deret", true),
            objective("Silogisme", false),
        ];
        let mastery = topic_mastery(&obs, 5.0);

        assert_eq!(mastery.len(), 2);
        assert_eq!(mastery[0].topic, "Deret");
        assert_eq!(mastery[0].attempts, 3);
        assert_eq!(mastery[0].correct, 2);
        assert_eq!(mastery[0].accuracy, 67);
        assert_eq!(mastery[1].accuracy, 0);
    }

    #[test]
    fn behavioral_accuracy_uses_weight_ratio() {
        let obs = vec![behavioral("Pelayanan", 5.0, 5.0), behavioral("Pelayanan", 2.0, 4.0)];
        let mastery = topic_mastery(&obs, 5.0);
        // (5 + 2) / (5 + 4) = 77.8%
        assert_eq!(mastery[0].accuracy, 78);
        assert_eq!(mastery[0].correct, 1);
    }

    #[test]
    fn all_zero_weights_fall_back_to_ceiling() {
        let obs = vec![behavioral("Jejaring", 0.0, 0.0), behavioral("Jejaring", 5.0, 5.0)];
        let mastery = topic_mastery(&obs, 5.0);
        assert_eq!(mastery[0].accuracy, 50);
    }

    #[test]
    fn same_topic_in_different_categories_stays_separate() {
        let mut twk = objective("Umum", true);
        twk.category = Category::Twk;
        let mastery = topic_mastery(&[twk, objective("Umum", false)], 5.0);
        assert_eq!(mastery.len(), 2);
        assert_eq!(mastery[0].category, Category::Twk);
        assert_eq!(mastery[1].category, Category::Tiu);
    }
}
