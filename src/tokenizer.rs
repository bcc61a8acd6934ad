//! Tokenization, shingling and Jaccard similarity.
//!
//! The punctuation class and stop-word set here are the single source of
//! truth for document statistics, per-candidate term frequency, query
//! tokenization and shingle generation. Any other module that needs to
//! tokenize text MUST go through [`tokenize`] rather than duplicating the
//! rule set; a drift here is a correctness bug, not a style issue.

use std::collections::HashSet;

const PUNCTUATION: &[char] = &[
    '`', '~', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '-', '_', '=', '+', '[', ']', '{',
    '}', ';', ':', '\'', '"', ',', '.', '<', '>', '/', '?', '\\', '|',
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "of", "to", "in", "on", "for", "with", "is", "it", "as",
    "at", "by", "be", "are", "was", "were", "this", "that", "from", "we", "you", "they", "i",
    "me", "my", "your",
];

const MIN_TOKEN_LEN: usize = 2;

/// Default shingle window size used throughout the crate.
pub const DEFAULT_SHINGLE_SIZE: usize = 3;

/// Lowercase, strip punctuation, split on whitespace, drop short tokens and
/// stop words. Deterministic and total; order is preserved for shingling.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .chars()
        .map(|c| if PUNCTUATION.contains(&c) { ' ' } else { c })
        .collect::<String>()
        .to_lowercase();

    normalized
        .split_whitespace()
        .filter(|tok| tok.len() >= MIN_TOKEN_LEN)
        .filter(|tok| !STOP_WORDS.contains(tok))
        .map(str::to_owned)
        .collect()
}

/// Sliding window over the token sequence, joined by a single space.
/// Empty if there are fewer than `n` tokens.
#[must_use]
pub fn shingles(tokens: &[String], n: usize) -> HashSet<String> {
    if n == 0 || tokens.len() < n {
        return HashSet::new();
    }
    tokens
        .windows(n)
        .map(|window| window.join(" "))
        .collect()
}

/// Jaccard similarity of the 3-shingle sets of `a` and `b`; `0.0` when both
/// sets are empty.
#[must_use]
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let shingles_a = shingles(&tokenize(a), DEFAULT_SHINGLE_SIZE);
    let shingles_b = shingles(&tokenize(b), DEFAULT_SHINGLE_SIZE);

    if shingles_a.is_empty() && shingles_b.is_empty() {
        return 0.0;
    }

    let intersection = shingles_a.intersection(&shingles_b).count();
    let union = shingles_a.union(&shingles_b).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}
