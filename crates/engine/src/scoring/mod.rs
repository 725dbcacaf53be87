//! Relevance scoring strategies and pool ranking.
//!
//! Two built-in [`RelevanceScorer`]s:
//! - [`KeywordScorer`]: query-term overlap with title weighting
//! - [`VectorScorer`]: cosine similarity over embeddings from an [`Embedder`]
//!
//! [`rank`] turns a pool into score-sorted [`ScoredItem`]s. The sort is
//! stable, so equal scores keep input order (first seen wins).

pub mod keyword;
pub mod vector;

pub use keyword::KeywordScorer;
pub use vector::{Embedder, HashingEmbedder, VectorScorer, cosine_similarity};

use promptpack_core::{ContextItem, RelevanceScorer, ScoredItem, ScoringError};

/// Score every item against the query and sort descending by score.
///
/// Fails only if the scorer does: an error or a NaN/infinite score is a
/// bug in the plugged-in strategy and is propagated unchanged.
pub fn rank(
    scorer: &dyn RelevanceScorer,
    query: &str,
    items: Vec<ContextItem>,
) -> Result<Vec<ScoredItem>, ScoringError> {
    let mut scored = Vec::with_capacity(items.len());
    for item in items {
        let score = scorer.score(query, &item)?;
        if !score.is_finite() {
            return Err(ScoringError::NonFinite {
                scorer: scorer.name().to_string(),
                item_id: item.id,
            });
        }
        scored.push(ScoredItem::new(item, score));
    }

    // Stable: ties keep input order.
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(scored)
}

/// Split text into lowercase search terms.
///
/// Terms are maximal runs of alphanumeric characters, at least two
/// characters long, excluding a short list of English stopwords.
pub fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().nth(1).is_some())
        .map(|word| word.to_lowercase())
        .filter(|word| !STOPWORDS.contains(&word.as_str()))
}

const STOPWORDS: &[&str] = &[
    "an", "and", "are", "as", "at", "be", "by", "for", "from", "how", "in", "is", "it", "of",
    "on", "or", "that", "the", "this", "to", "was", "what", "when", "which", "with",
];
