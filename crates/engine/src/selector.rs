//! Tiered selection: split a ranked pool into full, summary, and omitted
//! tiers by position.

use promptpack_core::{ScoredItem, Tier, TierConfig};

/// Assign tiers to items already sorted by descending score.
///
/// The first `top_k_full_content` items become [`Tier::Full`], the next
/// `next_k_summaries` become [`Tier::Summary`], and everything after is
/// [`Tier::Omitted`]. A zero size leaves that tier empty. Order is kept.
pub fn select(ranked: Vec<ScoredItem>, tiers: TierConfig) -> Vec<ScoredItem> {
    let summary_end = tiers
        .top_k_full_content
        .saturating_add(tiers.next_k_summaries);

    ranked
        .into_iter()
        .enumerate()
        .map(|(position, scored)| {
            let tier = if position < tiers.top_k_full_content {
                Tier::Full
            } else if position < summary_end {
                Tier::Summary
            } else {
                Tier::Omitted
            };
            scored.with_tier(tier)
        })
        .collect()
}

/// Number of items in the given tier.
pub fn count_tier(items: &[ScoredItem], tier: Tier) -> usize {
    items.iter().filter(|s| s.tier == tier).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptpack_core::ContextItem;

    fn ranked(n: usize) -> Vec<ScoredItem> {
        (0..n)
            .map(|i| {
                let id = format!("s{i}");
                ScoredItem::new(ContextItem::skill(id.clone(), id, "body"), (n - i) as f32)
            })
            .collect()
    }

    fn tiers_of(items: &[ScoredItem]) -> Vec<Tier> {
        items.iter().map(|s| s.tier).collect()
    }

    #[test]
    fn splits_into_three_tiers() {
        let items = select(ranked(6), TierConfig::new(2, 3));
        assert_eq!(
            tiers_of(&items),
            [
                Tier::Full,
                Tier::Full,
                Tier::Summary,
                Tier::Summary,
                Tier::Summary,
                Tier::Omitted
            ]
        );
        assert_eq!(items[0].id(), "s0");
        assert_eq!(items[5].id(), "s5");
    }

    #[test]
    fn small_pool_is_all_full() {
        let items = select(ranked(2), TierConfig::new(3, 2));
        assert_eq!(tiers_of(&items), [Tier::Full, Tier::Full]);
    }

    #[test]
    fn zero_full_tier_starts_with_summaries() {
        let items = select(ranked(3), TierConfig::new(0, 2));
        assert_eq!(tiers_of(&items), [Tier::Summary, Tier::Summary, Tier::Omitted]);
    }

    #[test]
    fn zero_tiers_omit_everything() {
        let items = select(ranked(3), TierConfig::new(0, 0));
        assert_eq!(count_tier(&items, Tier::Omitted), 3);
    }

    #[test]
    fn huge_tier_sizes_do_not_overflow() {
        let items = select(ranked(4), TierConfig::new(usize::MAX, usize::MAX));
        assert_eq!(count_tier(&items, Tier::Full), 4);
    }

    #[test]
    fn empty_pool_selects_nothing() {
        assert!(select(Vec::new(), TierConfig::new(3, 2)).is_empty());
    }

    #[test]
    fn default_tiers_keep_everything_full() {
        let tiered = select(ranked(7), TierConfig::default());
        assert_eq!(count_tier(&tiered, Tier::Full), 7);
        assert_eq!(count_tier(&tiered, Tier::Omitted), 0);
    }
}
