#![forbid(unsafe_code)]

pub mod access;
pub mod analytics_service;
pub mod app_services;
pub mod error;
pub mod leaderboard_service;
pub mod sessions;

pub use tryout_core::Clock;

pub use access::{AccessControl, StaticAccessControl};
pub use analytics_service::{AnalyticsService, UserAnalytics};
pub use app_services::AppServices;
pub use error::{AppServicesError, AssessmentError};
pub use leaderboard_service::{LeaderboardService, PercentileReport};
pub use sessions::{AssessmentService, CategoryResult, SessionProgress, SessionResult};
