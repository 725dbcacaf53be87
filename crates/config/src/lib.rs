//! Configuration loading, validation, and management for PromptPack.
//!
//! Loads configuration from `~/.promptpack/config.toml` with environment
//! variable overrides. Validates budgets and summary settings at startup.

use promptpack_core::{Category, PoolSettings, TierConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The root configuration structure.
///
/// Maps directly to `~/.promptpack/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackConfig {
    /// Fixed length (chars) of a summary-tier item's condensed content
    #[serde(default = "default_summary_length")]
    pub summary_length: usize,

    /// Smallest excerpt or summary worth emitting; below this an item is
    /// dropped instead
    #[serde(default = "default_min_snippet")]
    pub min_snippet: usize,

    /// Relevance scoring strategy
    #[serde(default)]
    pub scorer: ScorerKind,

    /// Summarization strategy
    #[serde(default)]
    pub summarizer: SummarizerKind,

    /// Text placed before every context section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_preamble: Option<String>,

    /// Per-pool budgets and tier sizes
    #[serde(default)]
    pub pools: PoolsConfig,
}

fn default_summary_length() -> usize {
    500
}
fn default_min_snippet() -> usize {
    40
}

/// Which relevance scorer the engine builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Term overlap with title weighting
    #[default]
    Keyword,
    /// Cosine similarity over feature-hashed bag-of-words vectors
    HashedVector,
}

/// Which summarizer the engine builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarizerKind {
    /// Head cut on a word boundary with an ellipsis
    #[default]
    Head,
    /// Leading whole sentences, falling back to a head cut
    Sentence,
}

impl FromStr for ScorerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(Self::Keyword),
            "hashed_vector" | "vector" => Ok(Self::HashedVector),
            other => Err(ConfigError::ValidationError(format!(
                "unknown scorer '{other}' (expected keyword or hashed_vector)"
            ))),
        }
    }
}

impl FromStr for SummarizerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "head" => Ok(Self::Head),
            "sentence" => Ok(Self::Sentence),
            other => Err(ConfigError::ValidationError(format!(
                "unknown summarizer '{other}' (expected head or sentence)"
            ))),
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword => f.write_str("keyword"),
            Self::HashedVector => f.write_str("hashed_vector"),
        }
    }
}

impl fmt::Display for SummarizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("head"),
            Self::Sentence => f.write_str("sentence"),
        }
    }
}

/// Settings for each of the four knowledge pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolsConfig {
    #[serde(default = "default_skills")]
    pub skills: PoolSettings,

    #[serde(default = "default_customers")]
    pub customers: PoolSettings,

    #[serde(default = "default_documents")]
    pub documents: PoolSettings,

    #[serde(default = "default_urls")]
    pub urls: PoolSettings,
}

fn default_skills() -> PoolSettings {
    PoolSettings::ranked(10_000, TierConfig::new(3, 2))
}
fn default_customers() -> PoolSettings {
    PoolSettings::narrative(40_000)
}
fn default_documents() -> PoolSettings {
    PoolSettings::ranked(40_000, TierConfig::new(5, 5))
}
fn default_urls() -> PoolSettings {
    PoolSettings::ranked(5_000, TierConfig::new(10, 0))
}

impl Default for PoolsConfig {
    fn default() -> Self {
        Self {
            skills: default_skills(),
            customers: default_customers(),
            documents: default_documents(),
            urls: default_urls(),
        }
    }
}

impl PoolsConfig {
    /// Settings for a category's pool.
    pub fn get(&self, category: Category) -> PoolSettings {
        match category {
            Category::Skill => self.skills,
            Category::Customer => self.customers,
            Category::Document => self.documents,
            Category::Url => self.urls,
        }
    }
}

impl PackConfig {
    /// Load configuration from the default path (~/.promptpack/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `PROMPTPACK_SCORER`
    /// - `PROMPTPACK_SUMMARIZER`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in
    /// production).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(scorer) = lookup("PROMPTPACK_SCORER") {
            self.scorer = scorer.parse()?;
        }
        if let Some(summarizer) = lookup("PROMPTPACK_SUMMARIZER") {
            self.summarizer = summarizer.parse()?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".promptpack")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let settings = self.pools.get(category);
            if settings.budget == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "pools.{}.budget must be > 0",
                    pool_key(category)
                )));
            }
        }

        if self.summary_length == 0 {
            return Err(ConfigError::ValidationError(
                "summary_length must be > 0".into(),
            ));
        }

        if self.min_snippet > self.summary_length {
            return Err(ConfigError::ValidationError(
                "min_snippet must not exceed summary_length".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            summary_length: default_summary_length(),
            min_snippet: default_min_snippet(),
            scorer: ScorerKind::default(),
            summarizer: SummarizerKind::default(),
            system_preamble: None,
            pools: PoolsConfig::default(),
        }
    }
}

/// Table key under `[pools]` for a category.
pub fn pool_key(category: Category) -> &'static str {
    match category {
        Category::Skill => "skills",
        Category::Customer => "customers",
        Category::Document => "documents",
        Category::Url => "urls",
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptpack_core::PoolMode;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = PackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pools.skills.budget, 10_000);
        assert_eq!(config.pools.skills.tiers, TierConfig::new(3, 2));
        assert_eq!(config.pools.customers.mode, PoolMode::Narrative);
        assert_eq!(config.scorer, ScorerKind::Keyword);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = PackConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: PackConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn zero_budget_rejected() {
        let mut config = PackConfig::default();
        config.pools.documents.budget = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pools.documents.budget"));
    }

    #[test]
    fn min_snippet_above_summary_length_rejected() {
        let config = PackConfig {
            summary_length: 100,
            min_snippet: 200,
            ..PackConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = PackConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert_eq!(result.unwrap(), PackConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
summary_length = 300
scorer = "hashed_vector"

[pools.skills]
budget = 8000
top_k_full_content = 4
next_k_summaries = 1
"#
        )
        .unwrap();

        let config = PackConfig::load_from(file.path()).unwrap();
        assert_eq!(config.summary_length, 300);
        assert_eq!(config.scorer, ScorerKind::HashedVector);
        assert_eq!(config.pools.skills, PoolSettings::ranked(8000, TierConfig::new(4, 1)));
        assert_eq!(config.pools.urls, default_urls());
    }

    #[test]
    fn pool_without_tier_sizes_keeps_every_item_full() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pools.documents]\nbudget = 5000").unwrap();

        let config = PackConfig::load_from(file.path()).unwrap();
        assert_eq!(config.pools.documents, PoolSettings::ranked(5000, TierConfig::default()));
        assert_eq!(config.pools.documents.tiers.top_k_full_content, usize::MAX);

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: PackConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "summary_length = \"long\"").unwrap();
        let err = PackConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = PackConfig::default();
        config
            .apply_env_overrides(|key| match key {
                "PROMPTPACK_SCORER" => Some("hashed_vector".into()),
                "PROMPTPACK_SUMMARIZER" => Some("Sentence".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.scorer, ScorerKind::HashedVector);
        assert_eq!(config.summarizer, SummarizerKind::Sentence);
    }

    #[test]
    fn unknown_env_scorer_rejected() {
        let mut config = PackConfig::default();
        let err = config
            .apply_env_overrides(|key| (key == "PROMPTPACK_SCORER").then(|| "bm42".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("bm42"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = PackConfig::default_toml();
        assert!(toml_str.contains("summary_length = 500"));
        assert!(toml_str.contains("[pools.customers]"));
        assert!(toml_str.contains("narrative"));
    }
}
