//! Text normalization and tokenization
//!
//! ## Flow
//! 1. lowercase
//! 2. markup tags → space
//! 3. punctuation → space
//! 4. whitespace collapsed, trimmed

use regex::Regex;
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref PUNCT_RE: Regex = Regex::new(r"[^\p{Alphabetic}\p{N}\s]").unwrap();
    static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalize rich text for name matching
pub fn normalize_content(content: &str) -> String {
    let lowered = content.to_lowercase();
    let untagged = TAG_RE.replace_all(&lowered, " ");
    let unpunctuated = PUNCT_RE.replace_all(&untagged, " ");
    SPACE_RE.replace_all(&unpunctuated, " ").trim().to_string()
}

/// Plain text of rich content: tags removed, whitespace collapsed, case kept
pub fn strip_markup(content: &str) -> String {
    let untagged = TAG_RE.replace_all(content, " ");
    SPACE_RE.replace_all(&untagged, " ").trim().to_string()
}

/// Unique tokens of at least `min_length` chars, in first-seen order
pub fn tokenize(normalized: &str, min_length: usize) -> Vec<&str> {
    let mut seen = HashSet::new();
    normalized
        .split_whitespace()
        .filter(|token| token.chars().count() >= min_length)
        .filter(|token| seen.insert(*token))
        .collect()
}
