use serde::{Deserialize, Serialize};

use crate::analytics::weakness::{Severity, WeakTopic};
use crate::model::{Category, StudyMaterial};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub topic: String,
    pub category: Category,
    /// 1 is the weakest topic.
    pub priority: u32,
    pub severity: Severity,
    pub accuracy: u8,
    pub rationale: String,
    pub actions: Vec<String>,
    pub target_accuracy: Option<u8>,
    pub materials: Vec<StudyMaterial>,
}

fn actions_for(severity: Severity, topic: &str) -> Vec<String> {
    match severity {
        Severity::High => vec![
            format!("Review the core concepts of {topic} from the start"),
            format!("Work through 20 basic {topic} questions with full explanations"),
            "Write a one-page summary of the rules you keep missing".to_owned(),
            format!("Retake a {topic} drill within three days"),
        ],
        Severity::Medium => vec![
            format!("Practise 10 mixed-difficulty {topic} questions daily"),
            "Analyse every wrong answer before moving on".to_owned(),
            format!("Time yourself on a short {topic} set to build speed"),
        ],
    }
}

fn target_for(severity: Severity) -> u8 {
    match severity {
        Severity::High => 70,
        Severity::Medium => 85,
    }
}

/// One recommendation per weak topic, weakest first.
///
/// Ties on accuracy are ordered by category, then topic name. Materials whose
/// title or description mentions the topic are attached.
#[must_use]
pub fn recommend(weak: &[WeakTopic], materials: &[StudyMaterial]) -> Vec<Recommendation> {
    let mut ordered: Vec<&WeakTopic> = weak.iter().collect();
    ordered.sort_by(|a, b| {
        a.accuracy
            .cmp(&b.accuracy)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.topic.cmp(&b.topic))
    });

    ordered
        .into_iter()
        .zip(1_u32..)
        .map(|(w, priority)| Recommendation {
            topic: w.topic.clone(),
            category: w.category,
            priority,
            severity: w.severity,
            accuracy: w.accuracy,
            rationale: format!(
                "Accuracy on {} ({}) is {}%, below the {}% mastery line.",
                w.topic,
                w.category,
                w.accuracy,
                crate::analytics::weakness::STRONG_FROM
            ),
            actions: actions_for(w.severity, &w.topic),
            target_accuracy: Some(target_for(w.severity)),
            materials: materials
                .iter()
                .filter(|m| m.mentions(&w.topic))
                .cloned()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MaterialId;

    fn weak(topic: &str, accuracy: u8, severity: Severity) -> WeakTopic {
        WeakTopic {
            topic: topic.into(),
            category: Category::Tiu,
            accuracy,
            severity,
        }
    }

    #[test]
    fn weakest_topic_gets_first_priority() {
        let recs = recommend(
            &[
                weak("Silogisme", 62, Severity::Medium),
                weak("Deret", 30, Severity::High),
            ],
            &[],
        );
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].topic, "Deret");
        assert_eq!(recs[0].priority, 1);
        assert_eq!(recs[0].target_accuracy, Some(70));
        assert_eq!(recs[0].actions.len(), 4);
        assert!(recs[0].rationale.contains("30%"));
        assert_eq!(recs[1].priority, 2);
        assert_eq!(recs[1].actions.len(), 3);
    }

    #[test]
    fn matching_materials_are_attached() {
        let materials = vec![
            StudyMaterial::new(MaterialId::new(1), "Deret Angka", "number patterns"),
            StudyMaterial::new(MaterialId::new(2), "Logic", "intro to silogisme"),
        ];
        let recs = recommend(&[weak("silogisme", 40, Severity::High)], &materials);
        assert_eq!(recs[0].materials.len(), 1);
        assert_eq!(recs[0].materials[0].id, MaterialId::new(2));
    }

    #[test]
    fn no_weak_topics_means_no_recommendations() {
        assert!(recommend(&[], &[]).is_empty());
    }
}
