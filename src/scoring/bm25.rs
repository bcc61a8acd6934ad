//! BM25+ lexical scoring.

use std::collections::HashMap;

/// Term-frequency saturation.
pub const K1: f64 = 1.2;
/// Document-length normalization.
pub const B: f64 = 0.75;
/// Guards the BM25 denominator against division by zero.
const EPSILON: f64 = 1e-6;

/// Document frequencies over a candidate set: `term -> number of candidates containing it`.
pub type DocumentFrequencies = HashMap<String, usize>;

/// For each candidate's *unique* tokens, increment that term's document count once.
#[must_use]
pub fn build_document_frequencies<'a>(
    candidate_token_sets: impl IntoIterator<Item = &'a [String]>,
) -> DocumentFrequencies {
    let mut df = DocumentFrequencies::new();
    for tokens in candidate_token_sets {
        let unique: std::collections::HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique {
            *df.entry(term.to_owned()).or_insert(0) += 1;
        }
    }
    df
}

fn term_frequencies(doc_tokens: &[String]) -> HashMap<&str, usize> {
    let mut tf = HashMap::new();
    for tok in doc_tokens {
        *tf.entry(tok.as_str()).or_insert(0) += 1;
    }
    tf
}

/// BM25+ score of `query_tokens` against `doc_tokens`, given corpus statistics
/// and the `k1`/`b` tuning constants.
///
/// Returns `0.0` if either token list is empty. The IDF term always uses the
/// `+1` BM25+ variant, so it is non-negative for any `df`.
#[must_use]
pub fn calculate_bm25(
    query_tokens: &[String],
    doc_tokens: &[String],
    df: &DocumentFrequencies,
    n: usize,
    avg_doc_len: f64,
    k1: f64,
    b: f64,
) -> f64 {
    if query_tokens.is_empty() || doc_tokens.is_empty() {
        return 0.0;
    }

    let tf = term_frequencies(doc_tokens);
    let doc_len = doc_tokens.len() as f64;
    let n_f = n as f64;

    let unique_query_terms: std::collections::HashSet<&str> =
        query_tokens.iter().map(String::as_str).collect();

    let mut score = 0.0;
    for term in unique_query_terms {
        let Some(&term_freq) = tf.get(term) else {
            continue;
        };
        let term_freq = term_freq as f64;
        let doc_freq = df.get(term).copied().unwrap_or(0) as f64;

        let idf = ((n_f - doc_freq + 0.5) / (doc_freq + 0.5) + 1.0).ln();
        let numerator = term_freq * (k1 + 1.0);
        let denominator = term_freq + k1 * (1.0 - b + b * doc_len / avg_doc_len.max(1.0));

        score += idf * numerator / denominator.max(EPSILON);
    }

    score
}
