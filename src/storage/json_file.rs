//! File-backed `SettingsStore`, one JSON document per key.
//!
//! Stands in for the "real" backend a host application would inject: a thin
//! struct wrapping a handle (a base directory, here), async trait methods,
//! errors mapped through [`LearningError`]. No relational schema is needed
//! since the payloads this crate stores are opaque serialized arrays, not
//! rows.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::error::LearningError;
use crate::error::LearningResult;
use crate::storage::SettingsStore;

/// Persists each setting as `{base_dir}/{key}.json`.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    base_dir: PathBuf,
}

impl JsonFileSettingsStore {
    /// Use `base_dir` as the storage root. The directory is created lazily
    /// on first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, key: &str) -> LearningResult<PathBuf> {
        if key.is_empty() || key.contains('/') || key.contains("..") {
            return Err(LearningError::Storage(format!("invalid settings key: {key}")));
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

async fn ensure_parent(path: &Path) -> LearningResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| LearningError::Storage(e.to_string()))?;
    }
    Ok(())
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn get_setting(&self, key: &str) -> LearningResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LearningError::Storage(e.to_string())),
        }
    }

    async fn save_setting(&self, key: &str, value: String) -> LearningResult<()> {
        let path = self.path_for(key)?;
        ensure_parent(&path).await?;
        fs::write(&path, value)
            .await
            .map_err(|e| LearningError::Storage(e.to_string()))
    }

    async fn remove_setting(&self, key: &str) -> LearningResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LearningError::Storage(e.to_string())),
        }
    }

    async fn get_all_keys(&self) -> LearningResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(LearningError::Storage(e.to_string())),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| LearningError::Storage(e.to_string()))?
        {
            if let Some(name) = entry.file_name().to_str() {
                if let Some(key) = name.strip_suffix(".json") {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettingsStore::new(dir.path());
        store.save_setting("memory_ratings_p1", "[]".into()).await.unwrap();
        assert_eq!(
            store.get_setting("memory_ratings_p1").await.unwrap(),
            Some("[]".to_string())
        );
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettingsStore::new(dir.path());
        assert_eq!(store.get_setting("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn rejects_path_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettingsStore::new(dir.path());
        assert!(store.get_setting("../escape").await.is_err());
    }

    #[tokio::test]
    async fn get_all_keys_lists_saved_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettingsStore::new(dir.path());
        store.save_setting("a", "1".into()).await.unwrap();
        store.save_setting("b", "2".into()).await.unwrap();
        let mut keys = store.get_all_keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
