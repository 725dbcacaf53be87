//! Boundary truncation for single free-text blobs.
//!
//! Used where ranking does not apply, e.g. a customer-profile narrative
//! composed upstream. Text over budget is cut at the last whitespace at or
//! before the budget boundary, so words are never split and multi-byte
//! characters are never broken.

use serde::{Deserialize, Serialize};

use crate::token::{byte_offset, char_len};

/// Result of [`truncate_at_boundary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncated {
    pub text: String,
    pub truncated: bool,
}

/// Cut `text` to at most `budget` characters.
///
/// Text within budget is returned unchanged with `truncated = false`.
/// Otherwise the cut falls on the nearest whitespace not past the budget and
/// trailing whitespace is dropped. A window with no usable whitespace (one
/// giant token) yields an empty string: a word is never split.
pub fn truncate_at_boundary(text: &str, budget: usize) -> Truncated {
    if char_len(text) <= budget {
        return Truncated {
            text: text.to_string(),
            truncated: false,
        };
    }

    let boundary = byte_offset(text, budget);
    let window = &text[..boundary];
    let cut = if text[boundary..].starts_with(char::is_whitespace) {
        Some(boundary)
    } else {
        window.rfind(char::is_whitespace)
    };

    let kept = cut.map_or("", |idx| text[..idx].trim_end());

    Truncated {
        text: kept.to_string(),
        truncated: true,
    }
}
