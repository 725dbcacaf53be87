//! Built-in summarizers.
//!
//! Both respect the hard ceiling of the [`Summarizer`] contract: output is
//! never longer than `target_len` characters, and empty input gives an
//! empty string. Content that already fits is returned unchanged.

use promptpack_core::Summarizer;

use crate::token::{byte_offset, char_len, take_chars};

/// Marker appended to head-cut content.
pub const ELLIPSIS: char = '…';

/// Head truncation on a word boundary, followed by [`ELLIPSIS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadSummarizer;

impl Summarizer for HeadSummarizer {
    fn name(&self) -> &str {
        "head"
    }

    fn summarize(&self, content: &str, target_len: usize) -> String {
        if char_len(content) <= target_len {
            return content.to_string();
        }
        if target_len == 0 {
            return String::new();
        }

        let keep = target_len - 1;
        let head = take_chars(content, keep);
        let ends_on_word = content[head.len()..].starts_with(char::is_whitespace);
        // Back up to a word boundary unless that discards more than half.
        let cut = match head.rfind(char::is_whitespace) {
            _ if ends_on_word => head,
            Some(idx) if char_len(&head[..idx]) >= keep / 2 => &head[..idx],
            _ => head,
        };

        let mut out = cut.trim_end().to_string();
        out.push(ELLIPSIS);
        out
    }
}

/// Keeps the leading whole sentences that fit. Falls back to
/// [`HeadSummarizer`] when not even the first sentence fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceSummarizer;

impl Summarizer for SentenceSummarizer {
    fn name(&self) -> &str {
        "sentence"
    }

    fn summarize(&self, content: &str, target_len: usize) -> String {
        if char_len(content) <= target_len {
            return content.to_string();
        }

        let limit = byte_offset(content, target_len);
        let mut best = None;
        let mut chars = content.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            let end = idx + c.len_utf8();
            if end > limit {
                break;
            }
            if matches!(c, '.' | '!' | '?' | '\n') {
                let at_break = match chars.peek() {
                    Some((_, next)) => next.is_whitespace(),
                    None => true,
                };
                if at_break {
                    best = Some(end);
                }
            }
        }

        match best.map(|end| content[..end].trim()) {
            Some(sentences) if !sentences.is_empty() => sentences.to_string(),
            _ => HeadSummarizer.summarize(content, target_len),
        }
    }
}
