//! Selection configuration: the composite-utility weights and algorithm
//! constants as named, overridable fields instead of buried literals.
//!
//! `SelectionConfig::default()` reproduces the canonical constants (BM25's
//! `k1`/`b`, the composite weights, MMR's `lambda`, the oversample factor,
//! the default output limit) exactly.

use serde::{Deserialize, Serialize};

use crate::scoring::bm25;
use crate::diversity::mmr;

/// Composite-utility weights. Must sum to `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub importance: f64,
    pub tag_relevance: f64,
    pub lexical: f64,
    pub recency: f64,
    pub centrality: f64,
    pub thompson: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            importance: 0.10,
            tag_relevance: 0.25,
            lexical: 0.30,
            recency: 0.10,
            centrality: 0.10,
            thompson: 0.15,
        }
    }
}

/// Top-level configuration for `selectMemories`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub weights: SignalWeights,
    /// BM25 term-frequency saturation.
    pub bm25_k1: f64,
    /// BM25 document-length normalization.
    pub bm25_b: f64,
    /// MMR relevance/novelty trade-off.
    pub mmr_lambda: f64,
    /// Oversample pool size as a multiple of the requested limit.
    pub oversample_factor: usize,
    /// Default number of memories returned when the caller doesn't override it.
    pub default_limit: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            bm25_k1: bm25::K1,
            bm25_b: bm25::B,
            mmr_lambda: mmr::DEFAULT_LAMBDA,
            oversample_factor: 3,
            default_limit: 20,
        }
    }
}

impl SelectionConfig {
    /// Load a config from a TOML file, falling back to [`Default`] for any
    /// field the file omits. Returns the default config if `path` does not
    /// exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but fails to parse.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(String),
    #[error("failed to parse config file: {0}")]
    Parse(String),
}
