//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use tryout_core::ValidationError;

/// Errors emitted by the assessment, leaderboard and analytics services.
///
/// None of these are retried internally. Storage failures pass through
/// unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    /// Missing, or not owned by the requester.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("access denied")]
    AccessDenied,
    #[error("package does not exist")]
    InvalidPackage,
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
