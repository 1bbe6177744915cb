use thiserror::Error;

/// Input rejected before it can touch any state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("invalid option letter: {0:?}")]
    InvalidOption(String),

    #[error("invalid category: {0:?}")]
    InvalidCategory(String),

    #[error("invalid id: {0}")]
    InvalidId(#[from] crate::model::ParseIdError),

    #[error("objective question {0} needs a correct option")]
    MissingCorrectOption(u64),

    #[error("behavioral question {0} needs option weights")]
    MissingWeights(u64),

    #[error("option weight must be finite and non-negative, got {0}")]
    InvalidWeight(String),

    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("scoring rule {field} is out of range")]
    InvalidRule { field: &'static str },
}
