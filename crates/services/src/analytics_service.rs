use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use storage::repository::{
    AnswerRepository, MaterialRepository, QuestionRepository, SessionRepository,
};
use tryout_core::analytics::{
    HistorySummary, MasteryObservation, PassPrediction, Recommendation, TopicMastery,
    WeaknessReport, detect_weaknesses, predict_pass, recommend, summarize_history, topic_mastery,
};
use tryout_core::model::{PackageId, Question, QuestionId, Session, UserId, latest_per_question};
use tryout_core::scoring::ScoringRules;

use crate::error::AssessmentError;

/// Everything derived from one user's answer and score history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAnalytics {
    pub user_id: UserId,
    pub mastery: Vec<TopicMastery>,
    pub weaknesses: WeaknessReport,
    pub recommendations: Vec<Recommendation>,
    /// `None` until the user completes a session.
    pub history: Option<HistorySummary>,
    pub prediction: Option<PassPrediction>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    rules: ScoringRules,
    questions: Arc<dyn QuestionRepository>,
    sessions: Arc<dyn SessionRepository>,
    answers: Arc<dyn AnswerRepository>,
    materials: Arc<dyn MaterialRepository>,
}

impl AnalyticsService {
    #[must_use]
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        sessions: Arc<dyn SessionRepository>,
        answers: Arc<dyn AnswerRepository>,
        materials: Arc<dyn MaterialRepository>,
    ) -> Self {
        Self {
            rules: ScoringRules::default(),
            questions,
            sessions,
            answers,
            materials,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    /// Topic mastery, weaknesses, recommendations and a pass prediction.
    ///
    /// Mastery counts the latest answer per (session, question) across every
    /// session of the user, finished or not.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Storage` if any read fails.
    #[instrument(skip(self))]
    pub async fn get_analytics(&self, user_id: UserId) -> Result<UserAnalytics, AssessmentError> {
        let sessions = self.sessions.sessions_for_user(user_id).await?;
        let answers = self.answers.answers_for_user(user_id).await?;

        let packages: BTreeSet<PackageId> = sessions.iter().map(Session::package_id).collect();
        let mut catalog: HashMap<QuestionId, Question> = HashMap::new();
        for package_id in packages {
            for question in self.questions.questions_for_package(package_id).await? {
                catalog.insert(question.id(), question);
            }
        }

        let observations: Vec<MasteryObservation> = latest_per_question(&answers)
            .into_iter()
            .filter_map(|a| {
                catalog
                    .get(&a.question_id)
                    .map(|q| MasteryObservation::from_answer(q, a.selected))
            })
            .collect();
        let mastery = topic_mastery(&observations, self.rules.behavioral_weight_ceiling);
        let weaknesses = detect_weaknesses(&mastery);
        let materials = self.materials.list_materials().await?;
        let recommendations = recommend(&weaknesses.weak, &materials);

        let mut completed: Vec<&Session> = sessions.iter().filter(|s| s.is_completed()).collect();
        completed.sort_by_key(|s| (s.finished_at(), s.id()));
        let totals: Vec<i64> = completed.iter().filter_map(|s| s.total_score()).collect();
        let history = summarize_history(&totals);
        let prediction = history.map(|h| predict_pass(h.average, h.trend, h.consistency));

        debug!(
            topics = mastery.len(),
            weak = weaknesses.weak.len(),
            attempts = totals.len(),
            "analytics computed"
        );
        Ok(UserAnalytics {
            user_id,
            mastery,
            weaknesses,
            recommendations,
            history,
            prediction,
        })
    }
}
