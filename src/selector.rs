//! The selection orchestrator: pre-filter, corpus statistics, composite
//! utility, oversample, MMR, emit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::config::SelectionConfig;
use crate::diversity::{select_by_mmr, weighted_sample, MmrCandidate};
use crate::rating::{initialize_rating, thompson_sample, thompson_to_unit_interval};
use crate::scoring::{build_document_frequencies, calculate_bm25, centrality, importance, recency, tag_relevance};
use crate::tokenizer::tokenize;
use crate::types::{make_rating_key, MemoryChunk, MemoryRating, PromptKernel, SelectedMemory, SignalBreakdown};

/// Per-call overrides to `selectMemories`.
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    /// Number of memories to return. Defaults to `config.default_limit`.
    pub limit: Option<usize>,
    /// Skip the tag pre-filter even if the kernel has keywords.
    pub bypass_tag_filter: bool,
    /// Extra free-text terms appended to the BM25 query.
    pub query_terms: Vec<String>,
}

struct ScoredCandidate<'a> {
    chunk: &'a MemoryChunk,
    score: f64,
    breakdown: SignalBreakdown,
}

/// Select memories for `kernel` out of `memories`, using `ratings` as a
/// read-only snapshot of the learned utility table. Pure and total: never
/// raises, returns an empty vec for empty or fully-filtered inputs.
#[must_use]
pub fn select_memories(
    memories: &[MemoryChunk],
    kernel: &PromptKernel,
    ratings: &HashMap<String, MemoryRating>,
    config: &SelectionConfig,
    options: &SelectOptions,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Vec<SelectedMemory> {
    if memories.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<&MemoryChunk> = if !kernel.keywords.is_empty() && !options.bypass_tag_filter {
        memories
            .iter()
            .filter(|m| m.tags.intersection(&kernel.keywords).next().is_some())
            .collect()
    } else {
        memories.iter().collect()
    };

    if candidates.is_empty() {
        debug!(kernel_id = %kernel.id, "tag pre-filter eliminated all candidates");
        return Vec::new();
    }

    let doc_tokens: Vec<Vec<String>> = candidates.iter().map(|c| tokenize(&c.content)).collect();
    let df = build_document_frequencies(doc_tokens.iter().map(Vec::as_slice));
    let n = candidates.len();
    let avg_doc_len = doc_tokens.iter().map(Vec::len).sum::<usize>() as f64 / n as f64;

    let query_text = format!(
        "{} {} {} {}",
        kernel.name,
        kernel.prompt,
        kernel.keywords.iter().cloned().collect::<Vec<_>>().join(" "),
        options.query_terms.join(" "),
    );
    let query_tokens = tokenize(&query_text);

    debug!(
        kernel_id = %kernel.id,
        candidates = n,
        avg_doc_len,
        "built corpus statistics"
    );

    let mut scored: Vec<ScoredCandidate<'_>> = candidates
        .iter()
        .zip(doc_tokens.iter())
        .map(|(chunk, tokens)| {
            let bm25_raw =
                calculate_bm25(&query_tokens, tokens, &df, n, avg_doc_len, config.bm25_k1, config.bm25_b);
            let lexical = (1.0 + bm25_raw).ln() / 5.0;

            let key = make_rating_key(&chunk.id, &kernel.id);
            let rating = ratings
                .get(&key)
                .cloned()
                .unwrap_or_else(|| initialize_rating(&chunk.id, &kernel.id, now));
            let thompson_z = thompson_sample(rating.mu, rating.sigma, rng);
            let thompson_unit = thompson_to_unit_interval(thompson_z);

            let importance_signal = importance(chunk.importance);
            let tag_relevance_signal = tag_relevance(&chunk.tags, &kernel.keywords);
            let recency_signal = recency(chunk.timestamp, now);
            let centrality_signal = centrality(chunk.associations.as_ref(), &chunk.tags, &kernel.keywords);

            let w = &config.weights;
            let total = w.importance * importance_signal
                + w.tag_relevance * tag_relevance_signal
                + w.lexical * lexical
                + w.recency * recency_signal
                + w.centrality * centrality_signal
                + w.thompson * thompson_unit;

            ScoredCandidate {
                chunk: *chunk,
                score: total,
                breakdown: SignalBreakdown {
                    importance: importance_signal,
                    tag_relevance: tag_relevance_signal,
                    lexical,
                    recency: recency_signal,
                    centrality: centrality_signal,
                    thompson: thompson_unit,
                    bm25_raw,
                },
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let limit = options.limit.unwrap_or(config.default_limit);
    let oversample_size = (config.oversample_factor * limit).min(scored.len());

    let weights: Vec<f64> = scored.iter().map(|c| c.score).collect();
    let indices: Vec<usize> = (0..scored.len()).collect();
    let mut oversampled_indices = weighted_sample(&indices, &weights, oversample_size, rng);
    oversampled_indices.sort_by(|&a, &b| scored[b].score.total_cmp(&scored[a].score));

    debug!(oversample_size, limit, "oversampled candidate pool");

    let mmr_candidates: Vec<MmrCandidate<usize>> = oversampled_indices
        .iter()
        .map(|&idx| MmrCandidate {
            item: idx,
            content: scored[idx].chunk.content.clone(),
            score: scored[idx].score,
        })
        .collect();

    let diversified = select_by_mmr(&mmr_candidates, config.mmr_lambda, limit);

    diversified
        .into_iter()
        .map(|c| {
            let candidate = &scored[c.item];
            SelectedMemory {
                memory_id: candidate.chunk.id.clone(),
                content: candidate.chunk.content.clone(),
                tags: candidate.chunk.tags.clone(),
                score: candidate.score,
                signals: candidate.breakdown.clone(),
            }
        })
        .collect()
}
