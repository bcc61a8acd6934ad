//! Memory selection and reinforcement core.
//!
//! Given a pool of candidate memory chunks and a prompt kernel describing
//! the current task, [`selector::select_memories`] ranks, diversifies and
//! returns the memories worth injecting into a prompt. Outcomes reported
//! back through [`learning::LearningLoop`] update a per-(memory, kernel)
//! Bayesian rating that feeds the next selection's exploration term.
//!
//! Selection is pure and synchronous; persistence of ratings and
//! interactions is async and goes through an injected [`storage::SettingsStore`].

pub mod config;
pub mod diversity;
pub mod error;
pub mod learning;
pub mod rating;
pub mod scoring;
pub mod selector;
pub mod storage;
pub mod telemetry;
pub mod tokenizer;
pub mod types;

/// Commonly used items, re-exported for a single `use memory_core::prelude::*;`.
pub mod prelude {
    pub use crate::config::{SelectionConfig, SignalWeights};
    pub use crate::error::{CoreError, CoreResult, LearningError, LearningResult};
    pub use crate::learning::LearningLoop;
    pub use crate::selector::{select_memories, SelectOptions};
    pub use crate::storage::{InMemorySettingsStore, JsonFileSettingsStore, SettingsStore};
    pub use crate::types::{
        MemoryChunk, MemoryInteraction, MemoryRating, PromptKernel, Reward, SelectedMemory,
        SignalBreakdown,
    };
}
