//! In-memory `SettingsStore`, used by tests and as the reference backend.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::LearningResult;
use crate::storage::SettingsStore;

/// A `parking_lot`-guarded `HashMap` implementing [`SettingsStore`]. Not
/// persisted across process restarts; intended for tests and as a
/// lightweight default backend for callers with no durability needs.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    data: RwLock<HashMap<String, String>>,
}

impl InMemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get_setting(&self, key: &str) -> LearningResult<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn save_setting(&self, key: &str, value: String) -> LearningResult<()> {
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_setting(&self, key: &str) -> LearningResult<()> {
        self.data.write().remove(key);
        Ok(())
    }

    async fn get_all_keys(&self) -> LearningResult<Vec<String>> {
        Ok(self.data.read().keys().cloned().collect())
    }
}
