//! Knowledge items and the per-request values derived from them.
//!
//! Every type here is a value object: created for one request, consumed
//! within it, never persisted.

use serde::{Deserialize, Serialize};

use crate::pool::Category;

/// A normalized unit of knowledge: a skill, document, customer profile, or
/// reference URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    /// Stable identifier, unique within a pool.
    pub id: String,
    /// Short display label, used in the rendered section header.
    pub title: String,
    /// Full text body. May be empty, never absent.
    #[serde(default)]
    pub content: String,
    /// Selects the header template and the budget bucket.
    pub category: Category,
}

impl ContextItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            category,
        }
    }

    pub fn skill(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(id, title, content, Category::Skill)
    }

    pub fn document(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(id, title, content, Category::Document)
    }

    pub fn customer(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(id, title, content, Category::Customer)
    }

    /// A reference URL whose body has not been fetched. The content is the
    /// synthetic `URL: …` placeholder.
    pub fn url(id: impl Into<String>, title: impl Into<String>, url: &str) -> Self {
        Self::new(id, title, format!("URL: {url}"), Category::Url)
    }

    /// Content length in characters (the budget unit).
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Degradation level assigned by the Tiered Selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Eligible for verbatim inclusion.
    Full,
    /// Always condensed before inclusion.
    Summary,
    /// Ranked out; never packed.
    Omitted,
}

/// What actually happened to an item's content during packing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fidelity {
    /// Content included unchanged.
    #[default]
    Verbatim,
    /// A full-tier item shortened to fit the remaining budget.
    Excerpt,
    /// A summary-tier item passed through the summarizer.
    Summary,
}

/// A context item with its relevance score and tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: ContextItem,
    /// Higher = more relevant.
    pub score: f32,
    pub tier: Tier,
    /// Set by the packer; `Verbatim` until then.
    #[serde(default)]
    pub fidelity: Fidelity,
}

impl ScoredItem {
    /// Wrap an item with its score. The tier starts as `Full` until the
    /// selector assigns one.
    pub fn new(item: ContextItem, score: f32) -> Self {
        Self {
            item,
            score,
            tier: Tier::Full,
            fidelity: Fidelity::Verbatim,
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }
}

/// Provenance record for an item that made it into a rendered block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedItem {
    pub id: String,
    pub title: String,
    pub fidelity: Fidelity,
}

impl From<&ScoredItem> for UsedItem {
    fn from(scored: &ScoredItem) -> Self {
        Self {
            id: scored.item.id.clone(),
            title: scored.item.title.clone(),
            fidelity: scored.fidelity,
        }
    }
}

/// Output of the Budget Packer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackResult {
    /// Included items, full tier before summary tier, each in score order.
    /// Content holds what will be rendered (possibly condensed).
    pub items: Vec<ScoredItem>,
    /// True if anything was demoted, condensed, or dropped.
    pub truncated: bool,
}

impl PackResult {
    pub fn used_items(&self) -> Vec<UsedItem> {
        self.items.iter().map(UsedItem::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_items_carry_placeholder_content() {
        let item = ContextItem::url("u1", "Pricing page", "https://example.com/pricing");
        assert_eq!(item.category, Category::Url);
        assert_eq!(item.content, "URL: https://example.com/pricing");
    }

    #[test]
    fn content_len_counts_chars_not_bytes() {
        let item = ContextItem::document("d1", "Notes", "héllo wörld");
        assert_eq!(item.content_len(), 11);
        assert!(item.content.len() > 11);
    }

    #[test]
    fn missing_content_deserializes_as_empty() {
        let json = r#"{"id": "s1", "title": "Objections", "category": "skill"}"#;
        let item: ContextItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.content, "");
    }

    #[test]
    fn used_items_preserve_pack_order() {
        let result = PackResult {
            items: vec![
                ScoredItem::new(ContextItem::skill("b", "B", "x"), 2.0),
                ScoredItem::new(ContextItem::skill("a", "A", "y"), 1.0).with_tier(Tier::Summary),
            ],
            truncated: true,
        };
        let used = result.used_items();
        assert_eq!(used.len(), 2);
        assert_eq!(used[0].id, "b");
        assert_eq!(used[1].title, "A");
    }
}
