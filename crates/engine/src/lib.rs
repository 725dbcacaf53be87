//! Budgeted context assembly for PromptPack.
//!
//! Given a user query and pools of knowledge (skills, customer profiles,
//! documents, reference URLs), the engine selects, ranks, and condenses
//! content so each pool's rendered block fits its character budget, and
//! reports whether anything was cut.
//!
//! # Pipeline (per pool)
//!
//! 1. **Rank**: score each item with a [`RelevanceScorer`](promptpack_core::RelevanceScorer),
//!    stable-sort descending
//! 2. **Select**: first `top_k_full_content` items are full tier, the next
//!    `next_k_summaries` are summary tier, the rest are omitted
//! 3. **Pack**: greedily fit full items (verbatim, else excerpt), then
//!    summary items (always condensed) into the budget
//! 4. **Render**: one labeled section per included item
//!
//! Narrative pools instead render all items in input order and cut the
//! composite text at a whitespace boundary.
//!
//! The [`PromptOrchestrator`] runs every pool, joins the blocks in a fixed
//! section order, and ORs the per-pool `truncated` flags into
//! `context_truncated`. Nothing here performs I/O or keeps state between
//! calls.

pub mod orchestrator;
pub mod packer;
pub mod pipeline;
pub mod render;
pub mod scoring;
pub mod selector;
pub mod summarize;
pub mod token;
pub mod truncate;

pub use orchestrator::{AssembledPrompt, AssemblyReport, AssemblyRequest, PromptOrchestrator};
pub use packer::BudgetPacker;
pub use pipeline::{PoolOutput, PoolPipeline, PoolRequest, PoolStats};
pub use render::ContextRenderer;
pub use scoring::{Embedder, HashingEmbedder, KeywordScorer, VectorScorer, rank};
pub use selector::select;
pub use summarize::{HeadSummarizer, SentenceSummarizer};
pub use truncate::{Truncated, truncate_at_boundary};
