//! The storage interface injected by the host application.
//!
//! This crate treats persistence as an external collaborator: the selection
//! core never touches storage, and the learning loop is generic over any
//! backend implementing [`SettingsStore`]. Two reference adapters live here
//! ([`memory::InMemorySettingsStore`], [`json_file::JsonFileSettingsStore`]);
//! a host application is expected to inject its own.

pub mod json_file;
pub mod memory;

use async_trait::async_trait;

use crate::error::LearningResult;

/// Capability for reading and writing opaque serialized settings payloads,
/// keyed by string.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the raw serialized payload for `key`, or `None` if absent.
    async fn get_setting(&self, key: &str) -> LearningResult<Option<String>>;

    /// Persist a raw serialized payload under `key`.
    async fn save_setting(&self, key: &str, value: String) -> LearningResult<()>;

    /// Remove the payload stored under `key`, if any.
    async fn remove_setting(&self, key: &str) -> LearningResult<()>;

    /// List every key currently stored.
    async fn get_all_keys(&self) -> LearningResult<Vec<String>>;
}

pub use json_file::JsonFileSettingsStore;
pub use memory::InMemorySettingsStore;
