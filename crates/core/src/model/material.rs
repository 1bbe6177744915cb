use serde::{Deserialize, Serialize};

use crate::model::ids::MaterialId;

/// A study resource that recommendations can point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub id: MaterialId,
    pub title: String,
    pub description: String,
}

impl StudyMaterial {
    #[must_use]
    pub fn new(id: MaterialId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Case-insensitive substring match of `topic` against title or description.
    #[must_use]
    pub fn mentions(&self, topic: &str) -> bool {
        let needle = topic.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentions_matches_title_or_description() {
        let m = StudyMaterial::new(
            MaterialId::new(1),
            "Deret Angka Drill",
            "Practice set for number series and Pancasila basics",
        );
        assert!(m.mentions("deret angka"));
        assert!(m.mentions("PANCASILA"));
        assert!(!m.mentions("Silogisme"));
        assert!(!m.mentions("  "));
    }
}
