//! Stateless transformations from answered questions and score history into
//! study insights.

mod history;
mod mastery;
mod prediction;
mod recommendation;
mod weakness;

pub use history::{HistorySummary, summarize_history};
pub use mastery::{MasteryObservation, Outcome, TopicMastery, topic_mastery};
pub use prediction::{PassBand, PassPrediction, predict_pass};
pub use recommendation::{Recommendation, recommend};
pub use weakness::{Severity, WeakTopic, WeaknessReport, classify, detect_weaknesses};
