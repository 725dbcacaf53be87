//! Error types for the PromptPack domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Running out of budget is **not** an error anywhere in this crate: it is
//! reported through `truncated` flags. Only programming errors and scorer
//! faults surface here.

use thiserror::Error;

use crate::pool::Category;

/// The top-level error type for all PromptPack operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Assembly errors ---
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    // --- Scoring errors ---
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Raised by a relevance scorer. Indicates a bug in the plugged-in scorer,
/// so it is propagated to the caller rather than recovered from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("Scorer {scorer} produced a non-finite score for item {item_id}")]
    NonFinite { scorer: String, item_id: String },

    #[error("Scorer {scorer} rejected item {item_id}: {reason}")]
    Rejected {
        scorer: String,
        item_id: String,
        reason: String,
    },

    #[error("Embedding failed: {0}")]
    Embedding(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    #[error("Invalid budget for {category} pool: {budget} (must be positive)")]
    InvalidBudget { category: Category, budget: usize },

    #[error("More than one {0} pool supplied in a single request")]
    DuplicatePool(Category),

    #[error("{0}")]
    Scoring(#[from] ScoringError),
}
