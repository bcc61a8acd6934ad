//! Signal calculators: importance, tag relevance, recency, centrality.
//! All four return values in `[0, 1]`.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::types::{IMPORTANCE_MAX, IMPORTANCE_MIN};

/// Half-life for the recency decay, in milliseconds (14 days).
pub const RECENCY_HALF_LIFE_MS: f64 = 14.0 * 86_400_000.0;

/// Centrality spin multiplier applied when a memory tag overlaps a keyword.
const SPIN_ALIGNED: f64 = 1.25;
const SPIN_UNALIGNED: f64 = 1.0;
const CENTRALITY_DIVISOR: f64 = 10.0;

/// `(raw - 1) / 9`, clamped to `[0, 1]`.
#[must_use]
pub fn importance(raw: u8) -> f64 {
    let span = f64::from(IMPORTANCE_MAX - IMPORTANCE_MIN);
    ((f64::from(raw) - f64::from(IMPORTANCE_MIN)) / span).clamp(0.0, 1.0)
}

/// Fraction of kernel keywords present (case-insensitively) in `tags`.
/// `0.0` if either side is empty.
#[must_use]
pub fn tag_relevance(tags: &HashSet<String>, keywords: &HashSet<String>) -> f64 {
    if tags.is_empty() || keywords.is_empty() {
        return 0.0;
    }
    let matched = keywords.iter().filter(|k| tags.contains(*k)).count();
    matched as f64 / keywords.len() as f64
}

/// Exponential decay with a 14-day half-life. Future timestamps are treated
/// as "now" (age floored at zero).
#[must_use]
pub fn recency(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_ms = (now - timestamp).num_milliseconds().max(0) as f64;
    (-age_ms / RECENCY_HALF_LIFE_MS).exp()
}

/// `min(1, (|associations| * spin) / 10)`, where `spin` is `1.25` if any
/// memory tag overlaps a kernel keyword, else `1.0`.
#[must_use]
pub fn centrality(
    associations: Option<&HashSet<String>>,
    tags: &HashSet<String>,
    keywords: &HashSet<String>,
) -> f64 {
    let degree = associations.map_or(0, HashSet::len) as f64;
    let aligned = tags.iter().any(|t| keywords.contains(t));
    let spin = if aligned { SPIN_ALIGNED } else { SPIN_UNALIGNED };
    (degree * spin / CENTRALITY_DIVISOR).min(1.0)
}
