//! Context string building: serialize packed items into a labeled block.
//!
//! Each item becomes one section:
//!
//! ```text
//! ### Skill: Handling pricing objections [skill-42] (summary)
//! <content>
//! ```
//!
//! Sections are joined by a blank line. The header carries the title and
//! id so a reader can trace every section back to its source item; the
//! suffix says whether the content was condensed. No truncation happens
//! here. The packer budgets headers and separators with
//! [`ContextRenderer::section_overhead`], which measures exactly what
//! [`ContextRenderer::build`] emits.

use promptpack_core::{Category, ContextItem, Fidelity, ScoredItem};

use crate::token::char_len;

/// Placed between consecutive sections.
pub const SECTION_SEPARATOR: &str = "\n\n";

/// Stateless renderer for pool blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextRenderer;

impl ContextRenderer {
    /// Header line for one item, including its trailing newline.
    pub fn header(&self, category: Category, item: &ContextItem, fidelity: Fidelity) -> String {
        let suffix = match fidelity {
            Fidelity::Verbatim => "",
            Fidelity::Excerpt => " (excerpt)",
            Fidelity::Summary => " (summary)",
        };
        format!(
            "### {}: {} [{}]{}\n",
            category.item_label(),
            single_line(&item.title),
            single_line(&item.id),
            suffix
        )
    }

    /// Characters a section adds beyond its content: the header, plus the
    /// separator when it is not the first section.
    pub fn section_overhead(
        &self,
        category: Category,
        item: &ContextItem,
        fidelity: Fidelity,
        first: bool,
    ) -> usize {
        let separator = if first { 0 } else { char_len(SECTION_SEPARATOR) };
        char_len(&self.header(category, item, fidelity)) + separator
    }

    /// Render items in the given order. An empty slice renders as an empty
    /// string.
    pub fn build(&self, items: &[ScoredItem], category: Category) -> String {
        let mut out = String::new();
        for (idx, scored) in items.iter().enumerate() {
            if idx > 0 {
                out.push_str(SECTION_SEPARATOR);
            }
            out.push_str(&self.header(category, &scored.item, scored.fidelity));
            out.push_str(&scored.item.content);
        }
        out
    }
}

/// Collapse line breaks so a title cannot forge extra headers.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
