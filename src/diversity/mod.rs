//! Weighted oversampling and MMR re-ranking.

pub mod mmr;
pub mod sampling;

pub use mmr::{select_by_mmr, MmrCandidate, DEFAULT_LAMBDA};
pub use sampling::weighted_sample;
