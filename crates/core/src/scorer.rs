//! Relevance scoring seam.
//!
//! A scorer is a pure function from `(query, item)` to a score: identical
//! inputs give an identical score within a process, and higher means more
//! relevant. Empty queries or empty content must not fail; they score at
//! the bottom (e.g. `0.0`) and the caller's stable sort keeps input order.

use crate::error::ScoringError;
use crate::item::ContextItem;

/// Strategy for ranking context items against a query.
///
/// Implement this for keyword overlap, embedding similarity, or anything
/// else; the selector and packer never look past this trait. Any
/// `Fn(&str, &ContextItem) -> Result<f32, ScoringError>` is a scorer.
pub trait RelevanceScorer: Send + Sync {
    /// Short name, used in logs and error messages.
    fn name(&self) -> &str {
        "custom"
    }

    /// Score one item against the query.
    fn score(&self, query: &str, item: &ContextItem) -> Result<f32, ScoringError>;
}

impl<F> RelevanceScorer for F
where
    F: Fn(&str, &ContextItem) -> Result<f32, ScoringError> + Send + Sync,
{
    fn score(&self, query: &str, item: &ContextItem) -> Result<f32, ScoringError> {
        self(query, item)
    }
}
