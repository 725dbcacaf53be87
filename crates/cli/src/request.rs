//! JSON request files for `promptpack assemble`.
//!
//! ```json
//! {
//!   "query": "How do I handle the Acme renewal?",
//!   "user_instructions": "Answer in three bullet points.",
//!   "skills": [{ "id": "s1", "title": "Renewals", "content": "..." }],
//!   "customers": [{ "id": "c1", "title": "Acme Corp", "content": "..." }],
//!   "documents": [],
//!   "urls": [{ "id": "u1", "title": "Pricing page", "url": "https://..." }]
//! }
//! ```
//!
//! Items carry no category: the array they appear in decides it. Budgets
//! and tiers come from the config file.

use std::path::Path;

use promptpack_config::PackConfig;
use promptpack_core::{Category, ContextItem};
use promptpack_engine::AssemblyRequest;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestFile {
    pub query: String,
    #[serde(default)]
    pub user_instructions: Option<String>,
    #[serde(default)]
    pub skills: Vec<RequestItem>,
    #[serde(default)]
    pub customers: Vec<RequestItem>,
    #[serde(default)]
    pub documents: Vec<RequestItem>,
    #[serde(default)]
    pub urls: Vec<RequestItem>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Reference URL; used as the body when `content` is empty.
    #[serde(default)]
    pub url: Option<String>,
}

impl RequestItem {
    fn into_item(self, category: Category) -> ContextItem {
        match self.url {
            Some(url) if self.content.is_empty() => ContextItem::url(self.id, self.title, &url),
            _ => ContextItem::new(self.id, self.title, self.content, category),
        }
    }
}

impl RequestFile {
    pub fn read(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read request {}: {e}", path.display()))?;
        Self::parse(&raw).map_err(|e| format!("Invalid request {}: {e}", path.display()).into())
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Convert into an engine request. Empty arrays produce no pool.
    pub fn into_assembly(self, config: &PackConfig) -> AssemblyRequest {
        let pools = [
            (Category::Skill, self.skills),
            (Category::Customer, self.customers),
            (Category::Document, self.documents),
            (Category::Url, self.urls),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(category, items)| {
            let items = items.into_iter().map(|i| i.into_item(category)).collect();
            (category, items)
        });

        let request = AssemblyRequest::from_config(config, self.query, pools);
        match self.user_instructions {
            Some(instructions) => request.with_user_instructions(instructions),
            None => request,
        }
    }
}
