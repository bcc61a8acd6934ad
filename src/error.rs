//! Crate-level error types.
//!
//! Two independent taxonomies: selection is pure and total and never
//! raises; learning operations surface storage failures to the caller
//! because a lost write is user-visible.

use thiserror::Error;

/// Errors from arithmetic or contract-violation paths that should never
/// occur in practice. Selection itself never returns this; it exists so
/// internal helpers can propagate instead of panicking.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid corpus statistics: {0}")]
    InvalidCorpusStats(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced by the learning loop (feedback application, rating
/// persistence). Selection never produces these.
#[derive(Debug, Error)]
pub enum LearningError {
    /// No storage backend was injected.
    #[error("storage backend unavailable")]
    StorageUnavailable,

    /// The stored payload failed to parse. Recovered-by-reset by the caller
    /// (treated as an empty table) rather than propagated; still
    /// represented here so the recovery point can log the underlying cause.
    #[error("stored payload is corrupt: {source}")]
    StorageCorrupt {
        #[source]
        source: serde_json::Error,
    },

    /// A genuine backend I/O failure (disk, network, permission).
    #[error("storage operation failed: {0}")]
    Storage(String),
}

pub type LearningResult<T> = Result<T, LearningError>;
