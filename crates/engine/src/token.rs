//! Size measurement utilities.
//!
//! Budgets are enforced in characters. Token counts are an estimate for
//! reporting only, using a character-based heuristic: ~4 characters per
//! token, accurate within ~10% for BPE tokenizers on English text.

/// Length of a string in characters (the budget unit).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Rounds up.
pub fn estimate_tokens(text: &str) -> usize {
    char_len(text).div_ceil(4)
}

/// Byte offset of the `n`th character, or the string length if it has
/// fewer than `n` characters. Always a valid char boundary.
pub fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// The first `n` characters of `text`.
pub fn take_chars(text: &str, n: usize) -> &str {
    &text[..byte_offset(text, n)]
}
