//! Keyword-overlap relevance scoring.

use std::collections::{HashMap, HashSet};

use promptpack_core::{ContextItem, RelevanceScorer, ScoringError};

use super::terms;

/// Default extra weight for a query term that appears in an item's title.
pub const DEFAULT_TITLE_WEIGHT: f32 = 2.0;

/// Scores items by how many query terms they contain.
///
/// For each distinct query term: `title_weight` if the title contains it,
/// plus `1 + ln(tf)` if the content contains it `tf` times. The sum is
/// divided by the number of distinct query terms. An empty query (or one
/// made only of stopwords) scores every item `0.0`.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    title_weight: f32,
}

impl KeywordScorer {
    pub fn new(title_weight: f32) -> Self {
        Self { title_weight }
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_WEIGHT)
    }
}

impl RelevanceScorer for KeywordScorer {
    fn name(&self) -> &str {
        "keyword"
    }

    fn score(&self, query: &str, item: &ContextItem) -> Result<f32, ScoringError> {
        // Vec, not a set: summation order must not depend on hashing.
        let mut query_terms: Vec<String> = Vec::new();
        for term in terms(query) {
            if !query_terms.contains(&term) {
                query_terms.push(term);
            }
        }
        if query_terms.is_empty() {
            return Ok(0.0);
        }

        let title_terms: HashSet<String> = terms(&item.title).collect();
        let mut frequencies: HashMap<String, usize> = HashMap::new();
        for term in terms(&item.content) {
            *frequencies.entry(term).or_insert(0) += 1;
        }

        let mut total = 0.0f32;
        for term in &query_terms {
            if title_terms.contains(term) {
                total += self.title_weight;
            }
            if let Some(&tf) = frequencies.get(term) {
                total += 1.0 + (tf as f32).ln();
            }
        }

        Ok(total / query_terms.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str, content: &str) -> ContextItem {
        ContextItem::document("d", title, content)
    }

    #[test]
    fn empty_query_scores_zero() {
        let scorer = KeywordScorer::default();
        assert_eq!(scorer.score("", &doc("Pricing", "pricing")).unwrap(), 0.0);
        assert_eq!(scorer.score("the and of", &doc("Pricing", "pricing")).unwrap(), 0.0);
    }

    #[test]
    fn empty_content_does_not_fail() {
        let scorer = KeywordScorer::default();
        assert_eq!(scorer.score("pricing", &doc("Other", "")).unwrap(), 0.0);
    }

    #[test]
    fn matching_item_outscores_unrelated() {
        let scorer = KeywordScorer::default();
        let relevant = doc("Renewals", "Handling pricing objections during renewal calls.");
        let unrelated = doc("Onboarding", "Setting up the workspace for new hires.");
        let a = scorer.score("pricing objections", &relevant).unwrap();
        let b = scorer.score("pricing objections", &unrelated).unwrap();
        assert!(a > b);
        assert_eq!(b, 0.0);
    }

    #[test]
    fn title_match_is_weighted() {
        let scorer = KeywordScorer::default();
        let in_title = doc("Pricing playbook", "How we discuss cost.");
        let in_body = doc("Playbook", "How we discuss pricing.");
        let a = scorer.score("pricing", &in_title).unwrap();
        let b = scorer.score("pricing", &in_body).unwrap();
        assert!(a > b);
    }

    #[test]
    fn repeated_terms_are_damped() {
        let scorer = KeywordScorer::default();
        let once = doc("x", "pricing");
        let many = doc("x", &"pricing ".repeat(100));
        let a = scorer.score("pricing", &once).unwrap();
        let b = scorer.score("pricing", &many).unwrap();
        assert!(b > a);
        assert!(b < 10.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let scorer = KeywordScorer::default();
        let item = doc("Security review", "SOC2 controls, encryption at rest, SSO and SCIM.");
        let first = scorer.score("sso encryption soc2", &item).unwrap();
        for _ in 0..10 {
            assert_eq!(scorer.score("sso encryption soc2", &item).unwrap(), first);
        }
    }
}
