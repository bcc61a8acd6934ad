//! Core data model: memory chunks, prompt kernels, ratings and interactions.
//!
//! Core entities: memory chunks, prompt kernels, ratings and interactions.
//! All owned by a single logical profile; nothing in this module reaches
//! across profiles.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clamp range for [`MemoryChunk::importance`].
pub const IMPORTANCE_MIN: u8 = 1;
pub const IMPORTANCE_MAX: u8 = 10;

/// Lower/upper bound enforced on [`MemoryRating::sigma`] after every update.
pub const SIGMA_MIN: f64 = 0.1;
pub const SIGMA_MAX: f64 = 2.0;

/// An atomic retrievable unit of memory.
///
/// Immutable for the purposes of the selection core: content and tags may be
/// regenerated upstream by an extractor, but nothing in this crate mutates a
/// `MemoryChunk` in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryChunk {
    /// Opaque identifier, unique within a profile.
    pub id: String,
    /// Free text, typically one to three sentences.
    pub content: String,
    /// Short lowercase labels; duplicates coalesced, compared case-insensitively.
    pub tags: HashSet<String>,
    /// User- or extractor-assigned stability/value signal, clamped to `[1, 10]`.
    pub importance: u8,
    /// Absolute instant of creation.
    pub timestamp: DateTime<Utc>,
    /// Undirected co-occurrence edges to other memory ids, used only as a degree count.
    pub associations: Option<HashSet<String>>,
    /// Optional grouping tag; unused by the core, passed through.
    pub episode_id: Option<String>,
}

impl MemoryChunk {
    /// Build a chunk, normalizing tags to lowercase and clamping importance.
    ///
    /// # Panics
    /// Panics if `content` is empty, per the data-model invariant that content
    /// is always non-empty.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        tags: impl IntoIterator<Item = impl Into<String>>,
        importance: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        assert!(!content.is_empty(), "MemoryChunk content must be non-empty");
        Self {
            id: id.into(),
            content,
            tags: tags.into_iter().map(|t| t.into().to_lowercase()).collect(),
            importance: clamp_importance(importance),
            timestamp,
            associations: None,
            episode_id: None,
        }
    }

    /// Attach association ids (co-occurrence edges).
    #[must_use]
    pub fn with_associations(mut self, associations: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.associations = Some(associations.into_iter().map(Into::into).collect());
        self
    }

    /// Attach an episode grouping tag.
    #[must_use]
    pub fn with_episode_id(mut self, episode_id: impl Into<String>) -> Self {
        self.episode_id = Some(episode_id.into());
        self
    }
}

fn clamp_importance(raw: i64) -> u8 {
    raw.clamp(i64::from(IMPORTANCE_MIN), i64::from(IMPORTANCE_MAX)) as u8
}

/// A query descriptor: the class of question plus the specific prompt text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptKernel {
    /// Stable identifier for the *class* of query (often a thread or task id).
    /// Forms the second axis of a rating key.
    pub id: String,
    /// Short human-readable name, concatenated into the BM25 query.
    pub name: String,
    /// Free-text prompt, concatenated into the BM25 query.
    pub prompt: String,
    /// Lowercase labels used for tag pre-filtering and alignment signals.
    pub keywords: HashSet<String>,
}

impl PromptKernel {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        prompt: impl Into<String>,
        keywords: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prompt: prompt.into(),
            keywords: keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
        }
    }
}

/// Learned per-(memory, kernel) utility estimate.
///
/// Ratings are sparse: an absent key means a fresh rating (`mu = 0`, `sigma = 1.0`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRating {
    pub memory_id: String,
    pub kernel_id: String,
    /// Posterior mean utility.
    pub mu: f64,
    /// Posterior standard deviation, always in `[0.1, 2.0]`.
    pub sigma: f64,
    /// Monotonic count of feedback events applied.
    pub uses: u64,
    pub last_updated_at: DateTime<Utc>,
}

impl MemoryRating {
    /// A fresh, uninformative rating: `mu = 0`, `sigma = 1.0`, `uses = 0`.
    pub fn fresh(memory_id: impl Into<String>, kernel_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            memory_id: memory_id.into(),
            kernel_id: kernel_id.into(),
            mu: 0.0,
            sigma: 1.0,
            uses: 0,
            last_updated_at: now,
        }
    }
}

/// Builds the compound key used to look up a [`MemoryRating`] in a rating table.
#[must_use]
pub fn make_rating_key(memory_id: &str, kernel_id: &str) -> String {
    format!("{memory_id}::{kernel_id}")
}

/// A single explicit or implicit feedback reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i8)]
pub enum Reward {
    Negative = -1,
    Neutral = 0,
    Positive = 1,
}

impl Reward {
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Negative => -1.0,
            Self::Neutral => 0.0,
            Self::Positive => 1.0,
        }
    }
}

/// Append-only feedback record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryInteraction {
    pub id: String,
    pub memory_id: String,
    pub kernel_id: String,
    pub context_id: String,
    pub reward: Reward,
    pub timestamp: DateTime<Utc>,
}

/// Most-recent interactions retained per profile.
pub const MAX_RETAINED_INTERACTIONS: usize = 1000;

/// Per-signal diagnostics and the composite score for one selected memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub importance: f64,
    pub tag_relevance: f64,
    pub lexical: f64,
    pub recency: f64,
    pub centrality: f64,
    pub thompson: f64,
    /// The raw (unscaled) BM25 score, kept for diagnostics only.
    pub bm25_raw: f64,
}

/// One memory emitted by `selectMemories`, in final MMR order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedMemory {
    pub memory_id: String,
    pub content: String,
    pub tags: HashSet<String>,
    pub score: f64,
    pub signals: SignalBreakdown,
}
