//! Embedding-similarity relevance scoring.
//!
//! Pure-Rust cosine similarity plus a pluggable [`Embedder`]. The bundled
//! [`HashingEmbedder`] needs no model: it hashes search terms into a fixed
//! number of buckets, which is enough for a deterministic lexical
//! similarity and keeps the scorer usable without external services.

use promptpack_core::{ContextItem, RelevanceScorer, ScoringError};

use super::terms;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Turns text into a fixed-length vector.
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    fn dimensions(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, ScoringError>;
}

/// Feature-hashing bag-of-words embedder.
///
/// Each search term increments the bucket chosen by its FNV-1a hash, so the
/// same text always yields the same vector, across processes too.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMENSIONS: usize = 512;

    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, ScoringError> {
        let mut vector = vec![0.0f32; self.dimensions];
        for term in terms(text) {
            let bucket = (fnv1a(term.as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
        Ok(vector)
    }
}

/// Scores items by cosine similarity between the query embedding and the
/// embedding of the item's title and content.
#[derive(Debug, Clone, Default)]
pub struct VectorScorer<E> {
    embedder: E,
}

impl<E: Embedder> VectorScorer<E> {
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }
}

impl<E: Embedder> RelevanceScorer for VectorScorer<E> {
    fn name(&self) -> &str {
        "vector"
    }

    fn score(&self, query: &str, item: &ContextItem) -> Result<f32, ScoringError> {
        let query_vec = self.embedder.embed(query)?;
        let item_vec = self
            .embedder
            .embed(&format!("{}\n{}", item.title, item.content))?;

        let expected = self.embedder.dimensions();
        if query_vec.len() != expected || item_vec.len() != expected {
            return Err(ScoringError::Embedding(format!(
                "{} returned {}/{} dimensions, expected {}",
                self.embedder.name(),
                query_vec.len(),
                item_vec.len(),
                expected
            )));
        }

        // Empty and unrelated inputs both floor at 0.
        Ok(cosine_similarity(&query_vec, &item_vec).max(0.0))
    }
}
