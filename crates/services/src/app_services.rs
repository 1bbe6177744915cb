use std::sync::Arc;

use storage::repository::Storage;
use tryout_core::scoring::ScoringRules;

use crate::Clock;
use crate::access::AccessControl;
use crate::analytics_service::AnalyticsService;
use crate::error::AppServicesError;
use crate::leaderboard_service::LeaderboardService;
use crate::sessions::AssessmentService;

/// Assembles the caller-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    assessment: Arc<AssessmentService>,
    leaderboard: Arc<LeaderboardService>,
    analytics: Arc<AnalyticsService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the scoring rules are invalid or storage
    /// initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        rules: ScoringRules,
        access: Arc<dyn AccessControl>,
    ) -> Result<Self, AppServicesError> {
        rules.validate()?;
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, rules, access)
    }

    /// Build services over an in-memory backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the scoring rules are invalid.
    pub fn in_memory(
        clock: Clock,
        rules: ScoringRules,
        access: Arc<dyn AccessControl>,
    ) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::in_memory(), clock, rules, access)
    }

    /// Wire services onto an existing storage bundle.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the scoring rules are invalid.
    pub fn from_storage(
        storage: Storage,
        clock: Clock,
        rules: ScoringRules,
        access: Arc<dyn AccessControl>,
    ) -> Result<Self, AppServicesError> {
        rules.validate()?;

        let assessment = Arc::new(
            AssessmentService::new(
                clock,
                Arc::clone(&storage.packages),
                Arc::clone(&storage.questions),
                Arc::clone(&storage.sessions),
                Arc::clone(&storage.answers),
                access,
            )
            .with_rules(rules),
        );
        let leaderboard = Arc::new(LeaderboardService::new(
            Arc::clone(&storage.packages),
            Arc::clone(&storage.sessions),
        ));
        let analytics = Arc::new(
            AnalyticsService::new(
                Arc::clone(&storage.questions),
                Arc::clone(&storage.sessions),
                Arc::clone(&storage.answers),
                Arc::clone(&storage.materials),
            )
            .with_rules(rules),
        );

        Ok(Self {
            storage,
            assessment,
            leaderboard,
            analytics,
        })
    }

    /// Direct repository access, used for catalog seeding.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn assessment(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessment)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn analytics(&self) -> Arc<AnalyticsService> {
        Arc::clone(&self.analytics)
    }
}
