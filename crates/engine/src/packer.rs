//! Budget packing: fit tiered items into a pool's character budget.
//!
//! Greedy, in two passes over the tiered items:
//!
//! 1. **Full tier**, in score order: include verbatim if the whole section
//!    fits; otherwise include an excerpt sized to what remains; skip once
//!    nothing useful fits.
//! 2. **Summary tier**, in score order: always condensed, to the lesser of
//!    the configured summary length and what remains.
//!
//! Omitted items are never packed. Every demotion, condensation, or drop
//! sets `truncated`; running out of budget is never an error.
//!
//! The budget covers the rendered block, headers and separators
//! included, so `build(pack(items, B).items)` is at most `B` characters.

use promptpack_core::{Category, Fidelity, PackResult, ScoredItem, Summarizer, Tier};
use tracing::{debug, warn};

use crate::render::ContextRenderer;
use crate::token::{char_len, take_chars};

/// Default length of a summary-tier item's condensed content.
pub const DEFAULT_SUMMARY_LENGTH: usize = 500;

/// Default smallest excerpt or summary worth emitting.
pub const DEFAULT_MIN_SNIPPET: usize = 40;

/// Packs one pool. Holds no per-call state; `remaining` lives in `pack`.
pub struct BudgetPacker<'a> {
    summarizer: &'a dyn Summarizer,
    renderer: ContextRenderer,
    summary_length: usize,
    min_snippet: usize,
}

impl<'a> BudgetPacker<'a> {
    pub fn new(summarizer: &'a dyn Summarizer) -> Self {
        Self {
            summarizer,
            renderer: ContextRenderer,
            summary_length: DEFAULT_SUMMARY_LENGTH,
            min_snippet: DEFAULT_MIN_SNIPPET,
        }
    }

    pub fn with_summary_length(mut self, summary_length: usize) -> Self {
        self.summary_length = summary_length;
        self
    }

    pub fn with_min_snippet(mut self, min_snippet: usize) -> Self {
        self.min_snippet = min_snippet;
        self
    }

    /// Pack tiered items for `category` into `budget` characters.
    ///
    /// Output order is full-tier items then summary-tier items, each in the
    /// order given (score order when fed from the selector).
    pub fn pack(&self, tiered: Vec<ScoredItem>, category: Category, budget: usize) -> PackResult {
        let mut remaining = budget;
        let mut truncated = false;
        let mut output: Vec<ScoredItem> = Vec::new();

        let mut full = Vec::new();
        let mut summary = Vec::new();
        for scored in tiered {
            match scored.tier {
                Tier::Full => full.push(scored),
                Tier::Summary => summary.push(scored),
                Tier::Omitted => truncated = true,
            }
        }

        for mut scored in full {
            let first = output.is_empty();
            let cost = self
                .renderer
                .section_overhead(category, &scored.item, Fidelity::Verbatim, first)
                + scored.item.content_len();
            if cost <= remaining {
                remaining -= cost;
                scored.fidelity = Fidelity::Verbatim;
                output.push(scored);
                continue;
            }

            truncated = true;
            match self.fit(&scored, category, Fidelity::Excerpt, first, remaining, remaining) {
                Some((content, cost)) => {
                    remaining -= cost;
                    scored.item.content = content;
                    scored.fidelity = Fidelity::Excerpt;
                    output.push(scored);
                }
                None => debug!(id = %scored.item.id, remaining, "dropping full-tier item"),
            }
        }

        for mut scored in summary {
            truncated = true;
            let first = output.is_empty();
            match self.fit(
                &scored,
                category,
                Fidelity::Summary,
                first,
                remaining,
                self.summary_length,
            ) {
                Some((content, cost)) => {
                    remaining -= cost;
                    scored.item.content = content;
                    scored.fidelity = Fidelity::Summary;
                    output.push(scored);
                }
                None => debug!(id = %scored.item.id, remaining, "dropping summary-tier item"),
            }
        }

        PackResult {
            items: output,
            truncated,
        }
    }

    /// Condense an item into what remains. Returns the new content and the
    /// section's total cost, or `None` if no useful snippet fits.
    fn fit(
        &self,
        scored: &ScoredItem,
        category: Category,
        fidelity: Fidelity,
        first: bool,
        remaining: usize,
        cap: usize,
    ) -> Option<(String, usize)> {
        let overhead = self
            .renderer
            .section_overhead(category, &scored.item, fidelity, first);
        if overhead > remaining {
            return None;
        }

        let content = &scored.item.content;
        if content.is_empty() {
            return Some((String::new(), overhead));
        }

        let room = (remaining - overhead).min(cap);
        let floor = self.min_snippet.min(char_len(content)).max(1);
        if room < floor {
            return None;
        }

        let mut condensed = self.summarizer.summarize(content, room);
        if char_len(&condensed) > room {
            warn!(
                summarizer = self.summarizer.name(),
                room, "summarizer exceeded its target length; clipping"
            );
            condensed = take_chars(&condensed, room).to_string();
        }
        if condensed.is_empty() {
            return None;
        }

        let cost = overhead + char_len(&condensed);
        Some((condensed, cost))
    }
}
