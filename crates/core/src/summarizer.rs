//! Summarization seam.
//!
//! Contract: `summarize(content, target_len)` is deterministic, bounded in
//! time, never fails, and returns at most `target_len` characters. Empty
//! input yields an empty string. Richer strategies (extractive, model
//! generated) may be swapped in as long as the ceiling holds.

/// Strategy for condensing content to a hard character ceiling.
///
/// Any `Fn(&str, usize) -> String` is a summarizer; the packer re-checks
/// the ceiling on whatever it returns.
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str {
        "custom"
    }

    fn summarize(&self, content: &str, target_len: usize) -> String;
}

impl<F> Summarizer for F
where
    F: Fn(&str, usize) -> String + Send + Sync,
{
    fn summarize(&self, content: &str, target_len: usize) -> String {
        self(content, target_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_summarizers() {
        let first_chars = |content: &str, n: usize| content.chars().take(n).collect::<String>();
        assert_eq!(first_chars.summarize("abcdef", 3), "abc");
        assert_eq!(first_chars.summarize("", 3), "");
    }
}
