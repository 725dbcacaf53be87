//! Knowledge pools and their per-request settings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a knowledge item.
///
/// Selects the formatting template and the budget bucket an item counts
/// against. The declaration order is the fixed section order of the final
/// prompt: skills, then customers, then documents, then URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Skill,
    Customer,
    Document,
    Url,
}

impl Category {
    /// All categories in prompt section order.
    pub const ALL: [Category; 4] = [
        Category::Skill,
        Category::Customer,
        Category::Document,
        Category::Url,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Customer => "customer",
            Self::Document => "document",
            Self::Url => "url",
        }
    }

    /// Label used in per-item section headers.
    pub fn item_label(&self) -> &'static str {
        match self {
            Self::Skill => "Skill",
            Self::Customer => "Customer",
            Self::Document => "Document",
            Self::Url => "Reference URL",
        }
    }

    /// Heading for the whole pool block in the assembled prompt.
    pub fn section_heading(&self) -> &'static str {
        match self {
            Self::Skill => "Skills",
            Self::Customer => "Customer Profiles",
            Self::Document => "Documents",
            Self::Url => "Reference URLs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier sizes for the Tiered Selector. Zero for either size simply leaves
/// that tier empty.
///
/// When `top_k_full_content` is not given, every item is full tier and only
/// the budget limits what is included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Number of top-ranked items kept with full content.
    #[serde(
        default = "TierConfig::all_items",
        skip_serializing_if = "TierConfig::is_all_items"
    )]
    pub top_k_full_content: usize,
    /// Number of following items kept as summaries.
    #[serde(default)]
    pub next_k_summaries: usize,
}

impl TierConfig {
    pub fn new(top_k_full_content: usize, next_k_summaries: usize) -> Self {
        Self {
            top_k_full_content,
            next_k_summaries,
        }
    }

    fn all_items() -> usize {
        usize::MAX
    }

    fn is_all_items(top_k: &usize) -> bool {
        *top_k == usize::MAX
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        Self::new(Self::all_items(), 0)
    }
}

/// How a pool is turned into a context block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolMode {
    /// Score, tier, pack, and render items (the default).
    #[default]
    Ranked,
    /// Concatenate items in input order into one composite text and cut it
    /// at a whitespace boundary. Used for customer profile narratives.
    Narrative,
}

/// Budget and selection settings for one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Maximum rendered size of the pool's block, in characters.
    pub budget: usize,
    #[serde(flatten)]
    pub tiers: TierConfig,
    #[serde(default)]
    pub mode: PoolMode,
}

impl PoolSettings {
    pub fn ranked(budget: usize, tiers: TierConfig) -> Self {
        Self {
            budget,
            tiers,
            mode: PoolMode::Ranked,
        }
    }

    /// Narrative pools ignore tier sizes.
    pub fn narrative(budget: usize) -> Self {
        Self {
            budget,
            tiers: TierConfig::default(),
            mode: PoolMode::Narrative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_order_matches_prompt_sections() {
        let mut shuffled = vec![
            Category::Url,
            Category::Document,
            Category::Skill,
            Category::Customer,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Category::ALL.to_vec());
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::Url).unwrap();
        assert_eq!(json, "\"url\"");
        let parsed: Category = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(parsed, Category::Customer);
    }

    #[test]
    fn pool_settings_flatten_tiers() {
        let json = r#"{"budget": 500, "top_k_full_content": 2, "next_k_summaries": 1}"#;
        let settings: PoolSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.budget, 500);
        assert_eq!(settings.tiers, TierConfig::new(2, 1));
        assert_eq!(settings.mode, PoolMode::Ranked);
    }

    #[test]
    fn unspecified_tiers_keep_every_item_full() {
        let settings: PoolSettings = serde_json::from_str(r#"{"budget": 5000}"#).unwrap();
        assert_eq!(settings.tiers, TierConfig::default());
        assert_eq!(settings.tiers.top_k_full_content, usize::MAX);
        assert_eq!(settings.tiers.next_k_summaries, 0);

        // The unbounded size is left out so TOML can hold it.
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("top_k_full_content"));
        let back: PoolSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn negative_budget_is_rejected_at_parse_time() {
        let json = r#"{"budget": -1}"#;
        assert!(serde_json::from_str::<PoolSettings>(json).is_err());
    }
}
