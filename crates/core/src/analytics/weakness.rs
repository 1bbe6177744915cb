use serde::{Deserialize, Serialize};

use crate::analytics::mastery::TopicMastery;
use crate::model::Category;

/// Below this accuracy a topic is a high-severity weakness.
pub const HIGH_SEVERITY_BELOW: u8 = 55;
/// At or above this accuracy a topic is strong.
pub const STRONG_FROM: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
}

/// `None` means the topic is strong.
#[must_use]
pub fn classify(accuracy: u8) -> Option<Severity> {
    if accuracy < HIGH_SEVERITY_BELOW {
        Some(Severity::High)
    } else if accuracy < STRONG_FROM {
        Some(Severity::Medium)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeakTopic {
    pub topic: String,
    pub category: Category,
    pub accuracy: u8,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeaknessReport {
    pub weak: Vec<WeakTopic>,
    pub strong: Vec<TopicMastery>,
}

#[must_use]
pub fn detect_weaknesses(mastery: &[TopicMastery]) -> WeaknessReport {
    let mut report = WeaknessReport::default();
    for m in mastery {
        match classify(m.accuracy) {
            Some(severity) => report.weak.push(WeakTopic {
                topic: m.topic.clone(),
                category: m.category,
                accuracy: m.accuracy,
                severity,
            }),
            None => report.strong.push(m.clone()),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_split_at_55_and_70() {
        assert_eq!(classify(0), Some(Severity::High));
        assert_eq!(classify(54), Some(Severity::High));
        assert_eq!(classify(55), Some(Severity::Medium));
        assert_eq!(classify(69), Some(Severity::Medium));
        assert_eq!(classify(70), None);
        assert_eq!(classify(100), None);
    }

    #[test]
    fn report_partitions_topics() {
        let mastery = vec![
            TopicMastery {
                topic: "Deret".into(),
                category: Category::Tiu,
                attempts: 10,
                correct: 4,
                accuracy: 40,
            },
            TopicMastery {
                topic: "Pancasila".into(),
                category: Category::Twk,
                attempts: 10,
                correct: 9,
                accuracy: 90,
            },
        ];
        let report = detect_weaknesses(&mastery);
        assert_eq!(report.weak.len(), 1);
        assert_eq!(report.weak[0].severity, Severity::High);
        assert_eq!(report.strong[0].topic, "Pancasila");
    }
}
