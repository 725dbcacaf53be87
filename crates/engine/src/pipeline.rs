//! Per-pool pipeline: rank → select → pack → render.
//!
//! Ranked pools run the full pipeline. Narrative pools skip ranking: their
//! items are rendered in input order as one composite text and cut by the
//! boundary truncator.

use promptpack_core::{
    Category, ContextItem, Fidelity, PoolMode, PoolSettings, RelevanceScorer, ScoredItem,
    ScoringError, Tier, UsedItem,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::packer::BudgetPacker;
use crate::render::{ContextRenderer, SECTION_SEPARATOR};
use crate::scoring::rank;
use crate::selector::{count_tier, select};
use crate::token::{char_len, estimate_tokens, take_chars};
use crate::truncate::truncate_at_boundary;

/// One pool of knowledge items with its budget and tier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRequest {
    pub category: Category,
    pub items: Vec<ContextItem>,
    pub settings: PoolSettings,
}

impl PoolRequest {
    /// Build a pool request. Items are re-tagged with the pool's category.
    pub fn new(category: Category, items: Vec<ContextItem>, settings: PoolSettings) -> Self {
        let items = items
            .into_iter()
            .map(|mut item| {
                item.category = category;
                item
            })
            .collect();
        Self {
            category,
            items,
            settings,
        }
    }
}

/// The rendered block and provenance for one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolOutput {
    pub category: Category,
    /// Rendered block; empty when nothing was included.
    pub rendered: String,
    pub truncated: bool,
    /// Items that contributed to `rendered`, in rendered order.
    pub used_items: Vec<UsedItem>,
    pub stats: PoolStats,
}

/// Statistics for a single pool, for the transparency report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub category: Category,
    pub mode: PoolMode,
    /// Configured budget in characters.
    pub budget: usize,
    /// Characters in the rendered block.
    pub chars_used: usize,
    /// Estimated tokens in the rendered block.
    pub estimated_tokens: usize,
    /// Items supplied.
    pub items_total: usize,
    /// Items included unchanged.
    pub items_verbatim: usize,
    /// Full-tier items included as shortened excerpts.
    pub items_excerpted: usize,
    /// Summary-tier items included as summaries.
    pub items_summarized: usize,
    /// Items ranked out before packing.
    pub items_omitted: usize,
    /// Items that reached the packer but did not fit.
    pub items_dropped: usize,
    pub truncated: bool,
}

/// Runs pools through the engine with one scorer and one packer.
pub struct PoolPipeline<'a> {
    scorer: &'a dyn RelevanceScorer,
    packer: BudgetPacker<'a>,
    renderer: ContextRenderer,
}

impl<'a> PoolPipeline<'a> {
    pub fn new(scorer: &'a dyn RelevanceScorer, packer: BudgetPacker<'a>) -> Self {
        Self {
            scorer,
            packer,
            renderer: ContextRenderer,
        }
    }

    /// Run one pool. Only the scorer can fail.
    pub fn run(&self, query: &str, pool: PoolRequest) -> Result<PoolOutput, ScoringError> {
        let output = match pool.settings.mode {
            PoolMode::Ranked => self.run_ranked(query, pool)?,
            PoolMode::Narrative => self.run_narrative(pool),
        };

        debug!(
            category = %output.category,
            budget = output.stats.budget,
            chars = output.stats.chars_used,
            total = output.stats.items_total,
            used = output.used_items.len(),
            truncated = output.truncated,
            "pool assembled"
        );
        Ok(output)
    }

    fn run_ranked(&self, query: &str, pool: PoolRequest) -> Result<PoolOutput, ScoringError> {
        let PoolRequest {
            category,
            items,
            settings,
        } = pool;
        let items_total = items.len();

        let tiered = select(rank(self.scorer, query, items)?, settings.tiers);
        let items_omitted = count_tier(&tiered, Tier::Omitted);
        let packed = self.packer.pack(tiered, category, settings.budget);

        let rendered = self.renderer.build(&packed.items, category);
        let count = |fidelity: Fidelity| {
            packed
                .items
                .iter()
                .filter(|s| s.fidelity == fidelity)
                .count()
        };

        let stats = PoolStats {
            category,
            mode: PoolMode::Ranked,
            budget: settings.budget,
            chars_used: char_len(&rendered),
            estimated_tokens: estimate_tokens(&rendered),
            items_total,
            items_verbatim: count(Fidelity::Verbatim),
            items_excerpted: count(Fidelity::Excerpt),
            items_summarized: count(Fidelity::Summary),
            items_omitted,
            items_dropped: items_total - items_omitted - packed.items.len(),
            truncated: packed.truncated,
        };

        Ok(PoolOutput {
            category,
            used_items: packed.used_items(),
            truncated: packed.truncated,
            rendered,
            stats,
        })
    }

    fn run_narrative(&self, pool: PoolRequest) -> PoolOutput {
        let PoolRequest {
            category,
            items,
            settings,
        } = pool;
        let items_total = items.len();

        let sections: Vec<ScoredItem> = items
            .into_iter()
            .map(|item| ScoredItem::new(item, 0.0))
            .collect();
        let extents = self.section_extents(&sections, category);
        let composite = self.renderer.build(&sections, category);
        let cut = truncate_at_boundary(&composite, settings.budget);
        let text = if cut.truncated {
            drop_partial_headers(cut.text, &extents)
        } else {
            cut.text
        };
        let kept = char_len(&text);

        let mut used_items = Vec::new();
        for (scored, extent) in sections.iter().zip(&extents) {
            if extent.body > kept {
                break;
            }
            let mut used = UsedItem::from(scored);
            if extent.end > kept {
                used.fidelity = Fidelity::Excerpt;
            }
            used_items.push(used);
        }

        let items_verbatim = used_items
            .iter()
            .filter(|u| u.fidelity == Fidelity::Verbatim)
            .count();
        let stats = PoolStats {
            category,
            mode: PoolMode::Narrative,
            budget: settings.budget,
            chars_used: kept,
            estimated_tokens: estimate_tokens(&text),
            items_total,
            items_verbatim,
            items_excerpted: used_items.len() - items_verbatim,
            items_summarized: 0,
            items_omitted: 0,
            items_dropped: items_total - used_items.len(),
            truncated: cut.truncated,
        };

        PoolOutput {
            category,
            rendered: text,
            truncated: cut.truncated,
            used_items,
            stats,
        }
    }

    /// Char offsets of each rendered section within the composite text.
    fn section_extents(&self, sections: &[ScoredItem], category: Category) -> Vec<SectionExtent> {
        let separator = char_len(SECTION_SEPARATOR);
        let mut extents = Vec::with_capacity(sections.len());
        let mut offset = 0;
        for (idx, scored) in sections.iter().enumerate() {
            let start = if idx == 0 { 0 } else { offset + separator };
            let header =
                char_len(&self.renderer.header(category, &scored.item, Fidelity::Verbatim));
            let body = start + header;
            let end = body + scored.item.content_len();
            extents.push(SectionExtent { start, body, end });
            offset = end;
        }
        extents
    }
}

/// Where one section sits in a narrative composite: header start, body
/// start, and end.
#[derive(Debug, Clone, Copy)]
struct SectionExtent {
    start: usize,
    body: usize,
    end: usize,
}

/// Cut a truncated composite back to the end of the last section whose
/// body survived, so it never ends in a header with no content after it.
fn drop_partial_headers(mut text: String, extents: &[SectionExtent]) -> String {
    loop {
        let kept = char_len(&text);
        let partial = extents.iter().position(|e| {
            e.start < kept && (kept < e.body || (kept == e.body && e.end > e.body))
        });
        let Some(idx) = partial else {
            return text;
        };
        let previous_end = if idx == 0 { 0 } else { extents[idx - 1].end };
        text = take_chars(&text, previous_end).trim_end().to_string();
    }
}
