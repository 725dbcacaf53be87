//! # PromptPack Core
//!
//! Domain types, traits, and error definitions for the PromptPack context
//! assembly engine. This crate holds **no algorithms**; it defines the model
//! that the engine, config, and CLI crates build against.
//!
//! ## Design Philosophy
//!
//! The two pluggable seams of the engine are traits defined here:
//! - [`RelevanceScorer`] ranks a knowledge item against a query
//! - [`Summarizer`] condenses content to a hard length ceiling
//!
//! Implementations live in `promptpack-engine`. Plain closures implement
//! both traits, so callers can inject a strategy without defining a type.

pub mod error;
pub mod item;
pub mod pool;
pub mod scorer;
pub mod summarizer;

// Re-export key types at crate root for ergonomics
pub use error::{AssemblyError, Error, Result, ScoringError};
pub use item::{ContextItem, Fidelity, PackResult, ScoredItem, Tier, UsedItem};
pub use pool::{Category, PoolMode, PoolSettings, TierConfig};
pub use scorer::RelevanceScorer;
pub use summarizer::Summarizer;
