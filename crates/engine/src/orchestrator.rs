//! Request orchestration: run every pool and assemble the final prompt.
//!
//! Sections appear in a fixed order regardless of request order:
//!
//! | Order | Section | Source |
//! |-------|---------|--------|
//! | 0 | Preamble | config `system_preamble` |
//! | 1 | Skills | ranked pool |
//! | 2 | Customer Profiles | narrative (or ranked) pool |
//! | 3 | Documents | ranked pool |
//! | 4 | Reference URLs | ranked pool |
//! | 5 | User Instructions | request |
//!
//! Each pool's `truncated` flag is OR-ed into one `context_truncated`
//! signal. Assembly is deterministic: identical requests produce identical
//! prompts, flags, and provenance. No state survives a call.

use std::collections::BTreeSet;

use promptpack_config::{PackConfig, ScorerKind, SummarizerKind};
use promptpack_core::{AssemblyError, Category, ContextItem, RelevanceScorer, Summarizer};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::packer::{BudgetPacker, DEFAULT_MIN_SNIPPET, DEFAULT_SUMMARY_LENGTH};
use crate::pipeline::{PoolOutput, PoolPipeline, PoolRequest, PoolStats};
use crate::scoring::{HashingEmbedder, KeywordScorer, VectorScorer};
use crate::summarize::{HeadSummarizer, SentenceSummarizer};
use crate::token::{char_len, estimate_tokens};

/// Heading of the trailing user-instructions section.
pub const USER_INSTRUCTIONS_HEADING: &str = "User Instructions";

/// Everything needed to assemble one prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssemblyRequest {
    /// The user's query; drives relevance ranking.
    pub query: String,
    /// At most one pool per category, in any order.
    #[serde(default)]
    pub pools: Vec<PoolRequest>,
    /// Free-text instructions appended after all context sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_instructions: Option<String>,
}

impl AssemblyRequest {
    /// Build a request whose pool budgets and tiers come from `config`.
    pub fn from_config<I>(config: &PackConfig, query: impl Into<String>, pools: I) -> Self
    where
        I: IntoIterator<Item = (Category, Vec<ContextItem>)>,
    {
        let pools = pools
            .into_iter()
            .map(|(category, items)| {
                PoolRequest::new(category, items, config.pools.get(category))
            })
            .collect();
        Self {
            query: query.into(),
            pools,
            user_instructions: None,
        }
    }

    pub fn with_user_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.user_instructions = Some(instructions.into());
        self
    }
}

/// The assembled prompt plus everything a caller needs to explain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledPrompt {
    pub prompt: String,
    /// True if any pool was truncated.
    pub context_truncated: bool,
    /// Per-pool output in section order.
    pub pools: Vec<PoolOutput>,
}

impl AssembledPrompt {
    /// Observability payload: sizes and per-pool breakdown, without text.
    pub fn report(&self) -> AssemblyReport {
        AssemblyReport {
            total_chars: char_len(&self.prompt),
            estimated_tokens: estimate_tokens(&self.prompt),
            context_truncated: self.context_truncated,
            pools: self.pools.iter().map(|p| p.stats.clone()).collect(),
        }
    }
}

/// Size and truncation summary of an assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyReport {
    pub total_chars: usize,
    pub estimated_tokens: usize,
    pub context_truncated: bool,
    pub pools: Vec<PoolStats>,
}

/// Runs every pool of a request and concatenates the result.
pub struct PromptOrchestrator {
    scorer: Box<dyn RelevanceScorer>,
    summarizer: Box<dyn Summarizer>,
    summary_length: usize,
    min_snippet: usize,
    preamble: Option<String>,
}

impl PromptOrchestrator {
    pub fn new(scorer: Box<dyn RelevanceScorer>, summarizer: Box<dyn Summarizer>) -> Self {
        Self {
            scorer,
            summarizer,
            summary_length: DEFAULT_SUMMARY_LENGTH,
            min_snippet: DEFAULT_MIN_SNIPPET,
            preamble: None,
        }
    }

    /// Keyword scoring and head summarization with default lengths.
    pub fn with_defaults() -> Self {
        Self::new(Box::new(KeywordScorer::default()), Box::new(HeadSummarizer))
    }

    /// Build the strategies and lengths named in `config`.
    pub fn from_config(config: &PackConfig) -> Self {
        let scorer: Box<dyn RelevanceScorer> = match config.scorer {
            ScorerKind::Keyword => Box::new(KeywordScorer::default()),
            ScorerKind::HashedVector => Box::new(VectorScorer::new(HashingEmbedder::default())),
        };
        let summarizer: Box<dyn Summarizer> = match config.summarizer {
            SummarizerKind::Head => Box::new(HeadSummarizer),
            SummarizerKind::Sentence => Box::new(SentenceSummarizer),
        };

        let mut orchestrator = Self::new(scorer, summarizer)
            .with_summary_length(config.summary_length)
            .with_min_snippet(config.min_snippet);
        orchestrator.preamble = config.system_preamble.clone();
        orchestrator
    }

    pub fn with_summary_length(mut self, summary_length: usize) -> Self {
        self.summary_length = summary_length;
        self
    }

    pub fn with_min_snippet(mut self, min_snippet: usize) -> Self {
        self.min_snippet = min_snippet;
        self
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    fn pipeline(&self) -> PoolPipeline<'_> {
        let packer = BudgetPacker::new(self.summarizer.as_ref())
            .with_summary_length(self.summary_length)
            .with_min_snippet(self.min_snippet);
        PoolPipeline::new(self.scorer.as_ref(), packer)
    }

    /// Run a single pool on its own.
    pub fn run_pool(&self, query: &str, pool: PoolRequest) -> Result<PoolOutput, AssemblyError> {
        validate_budget(&pool)?;
        Ok(self.pipeline().run(query, pool)?)
    }

    /// Assemble the full prompt.
    ///
    /// # Errors
    ///
    /// - [`AssemblyError::InvalidBudget`] if any pool has a zero budget
    /// - [`AssemblyError::DuplicatePool`] if a category appears twice
    /// - [`AssemblyError::Scoring`] if the scorer fails
    ///
    /// Budget exhaustion is not an error; see `context_truncated`.
    pub fn assemble(&self, request: AssemblyRequest) -> Result<AssembledPrompt, AssemblyError> {
        let AssemblyRequest {
            query,
            mut pools,
            user_instructions,
        } = request;

        let mut seen = BTreeSet::new();
        for pool in &pools {
            validate_budget(pool)?;
            if !seen.insert(pool.category) {
                return Err(AssemblyError::DuplicatePool(pool.category));
            }
        }
        // Stable sort into section order.
        pools.sort_by_key(|pool| pool.category);

        let pipeline = self.pipeline();
        let mut outputs = Vec::with_capacity(pools.len());
        for pool in pools {
            outputs.push(pipeline.run(&query, pool)?);
        }

        let mut sections: Vec<String> = Vec::new();
        if let Some(preamble) = self.preamble.as_deref().filter(|p| !p.trim().is_empty()) {
            sections.push(preamble.trim_end().to_string());
        }
        for output in &outputs {
            if !output.rendered.is_empty() {
                sections.push(format!(
                    "## {}\n\n{}",
                    output.category.section_heading(),
                    output.rendered
                ));
            }
        }
        if let Some(instructions) = user_instructions.as_deref().map(str::trim) {
            if !instructions.is_empty() {
                sections.push(format!("## {USER_INSTRUCTIONS_HEADING}\n\n{instructions}"));
            }
        }

        let context_truncated = outputs.iter().any(|o| o.truncated);
        let prompt = sections.join("\n\n");

        info!(
            pools = outputs.len(),
            chars = char_len(&prompt),
            estimated_tokens = estimate_tokens(&prompt),
            context_truncated,
            "prompt assembled"
        );

        Ok(AssembledPrompt {
            prompt,
            context_truncated,
            pools: outputs,
        })
    }
}

fn validate_budget(pool: &PoolRequest) -> Result<(), AssemblyError> {
    if pool.settings.budget == 0 {
        return Err(AssemblyError::InvalidBudget {
            category: pool.category,
            budget: pool.settings.budget,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptpack_core::{PoolSettings, ScoringError, TierConfig};

    fn pool(category: Category, items: Vec<ContextItem>) -> PoolRequest {
        PoolRequest::new(category, items, PoolSettings::ranked(5_000, TierConfig::new(5, 0)))
    }

    #[test]
    fn sections_follow_fixed_order() {
        let orchestrator = PromptOrchestrator::with_defaults();
        let request = AssemblyRequest {
            query: "renewal".into(),
            pools: vec![
                pool(Category::Url, vec![ContextItem::url("u1", "Docs", "https://example.com")]),
                pool(Category::Document, vec![ContextItem::document("d1", "Contract", "Terms.")]),
                pool(Category::Skill, vec![ContextItem::skill("s1", "Renewals", "Start early.")]),
                pool(Category::Customer, vec![ContextItem::customer("c1", "Acme", "Big account.")]),
            ],
            user_instructions: Some("Be concise.".into()),
        };

        let out = orchestrator.assemble(request).unwrap();
        let p = &out.prompt;
        let positions: Vec<usize> = [
            "## Skills",
            "## Customer Profiles",
            "## Documents",
            "## Reference URLs",
            "## User Instructions",
        ]
        .iter()
        .map(|h| p.find(h).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!out.context_truncated);
        let categories: Vec<Category> = out.pools.iter().map(|o| o.category).collect();
        assert_eq!(categories, Category::ALL.to_vec());
    }

    #[test]
    fn truncation_flags_are_ored() {
        let orchestrator = PromptOrchestrator::with_defaults();
        let mut skills = pool(
            Category::Skill,
            (0..4)
                .map(|i| ContextItem::skill(format!("s{i}"), "Skill", "body"))
                .collect(),
        );
        skills.settings.tiers = TierConfig::new(1, 0);
        let docs = pool(Category::Document, vec![ContextItem::document("d1", "Doc", "text")]);

        let out = orchestrator
            .assemble(AssemblyRequest {
                query: String::new(),
                pools: vec![docs, skills],
                user_instructions: None,
            })
            .unwrap();
        assert!(out.context_truncated);
        assert!(out.pools[0].truncated);
        assert!(!out.pools[1].truncated);
    }

    #[test]
    fn zero_budget_is_rejected() {
        let orchestrator = PromptOrchestrator::with_defaults();
        let mut bad = pool(Category::Document, Vec::new());
        bad.settings.budget = 0;
        let err = orchestrator
            .assemble(AssemblyRequest {
                query: "q".into(),
                pools: vec![bad],
                user_instructions: None,
            })
            .unwrap_err();
        assert_eq!(
            err,
            AssemblyError::InvalidBudget {
                category: Category::Document,
                budget: 0
            }
        );
    }

    #[test]
    fn duplicate_pools_are_rejected() {
        let orchestrator = PromptOrchestrator::with_defaults();
        let err = orchestrator
            .assemble(AssemblyRequest {
                query: "q".into(),
                pools: vec![pool(Category::Url, Vec::new()), pool(Category::Url, Vec::new())],
                user_instructions: None,
            })
            .unwrap_err();
        assert_eq!(err, AssemblyError::DuplicatePool(Category::Url));
    }

    #[test]
    fn scorer_failure_propagates() {
        let failing = |_: &str, item: &ContextItem| {
            Err::<f32, ScoringError>(ScoringError::Rejected {
                scorer: "failing".into(),
                item_id: item.id.clone(),
                reason: "boom".into(),
            })
        };
        let orchestrator = PromptOrchestrator::new(Box::new(failing), Box::new(HeadSummarizer));
        let err = orchestrator
            .assemble(AssemblyRequest {
                query: "q".into(),
                pools: vec![pool(Category::Skill, vec![ContextItem::skill("s", "S", "x")])],
                user_instructions: None,
            })
            .unwrap_err();
        assert!(matches!(err, AssemblyError::Scoring(_)));
    }

    #[test]
    fn empty_request_yields_empty_prompt() {
        let orchestrator = PromptOrchestrator::with_defaults();
        let out = orchestrator.assemble(AssemblyRequest::default()).unwrap();
        assert_eq!(out.prompt, "");
        assert!(!out.context_truncated);
        assert!(out.pools.is_empty());
    }

    #[test]
    fn preamble_and_blank_instructions() {
        let orchestrator =
            PromptOrchestrator::with_defaults().with_preamble("You are a sales assistant.");
        let out = orchestrator
            .assemble(AssemblyRequest::default().with_user_instructions("   "))
            .unwrap();
        assert_eq!(out.prompt, "You are a sales assistant.");
    }

    #[test]
    fn from_config_applies_pool_settings() {
        let config = PackConfig::default();
        let request = AssemblyRequest::from_config(
            &config,
            "q",
            [(Category::Customer, vec![ContextItem::customer("c1", "Acme", "x")])],
        );
        assert_eq!(request.pools[0].settings, config.pools.customers);
        let orchestrator = PromptOrchestrator::from_config(&config);
        let out = orchestrator.assemble(request).unwrap();
        assert!(out.prompt.starts_with("## Customer Profiles"));
    }

    #[test]
    fn report_summarizes_pools() {
        let orchestrator = PromptOrchestrator::with_defaults();
        let out = orchestrator
            .assemble(AssemblyRequest {
                query: "q".into(),
                pools: vec![pool(Category::Skill, vec![ContextItem::skill("s", "S", "x")])],
                user_instructions: None,
            })
            .unwrap();
        let report = out.report();
        assert_eq!(report.total_chars, char_len(&out.prompt));
        assert_eq!(report.pools.len(), 1);
        assert_eq!(report.pools[0].items_verbatim, 1);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"context_truncated\":false"));
    }
}
