//! The learning loop: loading/saving ratings and interactions through an
//! injected storage backend, and applying feedback.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::error::{LearningError, LearningResult};
use crate::rating::{initialize_rating, update_rating};
use crate::storage::SettingsStore;
use crate::types::{make_rating_key, MemoryInteraction, MemoryRating, Reward, MAX_RETAINED_INTERACTIONS};

fn ratings_key(profile_id: &str) -> String {
    format!("memory_ratings_{profile_id}")
}

fn interactions_key(profile_id: &str) -> String {
    format!("memory_interactions_{profile_id}")
}

/// Drives rating updates and interaction logging against a storage backend.
///
/// Generic over the [`SettingsStore`] port rather than any concrete
/// adapter, so callers can swap in whatever backend fits their deployment.
#[derive(Clone)]
pub struct LearningLoop<S: SettingsStore> {
    storage: Arc<S>,
}

impl<S: SettingsStore> LearningLoop<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Load the full rating table for `profile_id`. A corrupt stored payload
    /// is logged and treated as an empty table; only a backend I/O failure
    /// propagates.
    pub async fn load_ratings(&self, profile_id: &str) -> LearningResult<HashMap<String, MemoryRating>> {
        let Some(raw) = self.storage.get_setting(&ratings_key(profile_id)).await? else {
            return Ok(HashMap::new());
        };

        match serde_json::from_str::<Vec<MemoryRating>>(&raw) {
            Ok(records) => Ok(records
                .into_iter()
                .map(|r| (make_rating_key(&r.memory_id, &r.kernel_id), r))
                .collect()),
            Err(source) => {
                let corrupt = LearningError::StorageCorrupt { source };
                warn!(profile_id, error = %corrupt, "stored rating table is corrupt; resetting to empty");
                Ok(HashMap::new())
            }
        }
    }

    /// Persist the full rating table as an array of records.
    pub async fn save_ratings(
        &self,
        profile_id: &str,
        table: &HashMap<String, MemoryRating>,
    ) -> LearningResult<()> {
        let records: Vec<&MemoryRating> = table.values().collect();
        let raw = serde_json::to_string(&records).map_err(|e| LearningError::Storage(e.to_string()))?;
        self.storage.save_setting(&ratings_key(profile_id), raw).await
    }

    /// Load the interaction log, most recent 1000. A corrupt payload is
    /// treated as an empty log, matching `load_ratings`.
    pub async fn load_interactions(&self, profile_id: &str) -> LearningResult<Vec<MemoryInteraction>> {
        let Some(raw) = self.storage.get_setting(&interactions_key(profile_id)).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<MemoryInteraction>>(&raw) {
            Ok(records) => Ok(records),
            Err(source) => {
                let corrupt = LearningError::StorageCorrupt { source };
                warn!(profile_id, error = %corrupt, "stored interaction log is corrupt; resetting to empty");
                Ok(Vec::new())
            }
        }
    }

    async fn save_interactions(&self, profile_id: &str, mut interactions: Vec<MemoryInteraction>) -> LearningResult<()> {
        if interactions.len() > MAX_RETAINED_INTERACTIONS {
            let drop = interactions.len() - MAX_RETAINED_INTERACTIONS;
            interactions.drain(0..drop);
        }
        let raw = serde_json::to_string(&interactions).map_err(|e| LearningError::Storage(e.to_string()))?;
        self.storage.save_setting(&interactions_key(profile_id), raw).await
    }

    /// Apply a batch of explicit/implicit feedback rewards: update each
    /// affected rating and append one interaction record per reward, then
    /// persist both tables.
    pub async fn apply_feedback(
        &self,
        profile_id: &str,
        kernel_id: &str,
        context_id: &str,
        rewards: &[(String, Reward)],
        now: DateTime<Utc>,
    ) -> LearningResult<()> {
        let mut ratings = self.load_ratings(profile_id).await?;
        let mut interactions = self.load_interactions(profile_id).await?;

        for (memory_id, reward) in rewards {
            let key = make_rating_key(memory_id, kernel_id);
            let current = ratings
                .remove(&key)
                .unwrap_or_else(|| initialize_rating(memory_id, kernel_id, now));
            let updated = update_rating(&current, *reward, now);
            ratings.insert(key, updated);

            interactions.push(MemoryInteraction {
                id: Uuid::new_v4().to_string(),
                memory_id: memory_id.clone(),
                kernel_id: kernel_id.to_string(),
                context_id: context_id.to_string(),
                reward: *reward,
                timestamp: now,
            });
        }

        self.save_ratings(profile_id, &ratings).await?;
        self.save_interactions(profile_id, interactions).await?;
        Ok(())
    }

    /// Implicit usage signal: equivalent to `apply_feedback` with
    /// `reward = +1` for every id in `memory_ids`.
    pub async fn record_usage(
        &self,
        profile_id: &str,
        kernel_id: &str,
        context_id: &str,
        memory_ids: &[String],
        now: DateTime<Utc>,
    ) -> LearningResult<()> {
        let rewards: Vec<(String, Reward)> = memory_ids
            .iter()
            .cloned()
            .map(|id| (id, Reward::Positive))
            .collect();
        self.apply_feedback(profile_id, kernel_id, context_id, &rewards, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemorySettingsStore;

    fn learning_loop() -> LearningLoop<InMemorySettingsStore> {
        LearningLoop::new(Arc::new(InMemorySettingsStore::new()))
    }

    #[tokio::test]
    async fn save_then_load_reproduces_table() {
        let loop_ = learning_loop();
        let now = Utc::now();
        loop_
            .apply_feedback("p1", "k1", "c1", &[("m1".into(), Reward::Positive)], now)
            .await
            .unwrap();

        let table = loop_.load_ratings("p1").await.unwrap();
        assert_eq!(table.len(), 1);
        let rating = table.get(&make_rating_key("m1", "k1")).unwrap();
        assert!((rating.mu - 0.5).abs() < 1e-6);
        assert_eq!(rating.uses, 1);
    }

    #[tokio::test]
    async fn single_positive_feedback_matches_pinned_kalman_update() {
        let loop_ = learning_loop();
        let now = Utc::now();
        loop_
            .apply_feedback("p1", "k1", "c1", &[("m1".into(), Reward::Positive)], now)
            .await
            .unwrap();
        let table = loop_.load_ratings("p1").await.unwrap();
        let rating = table.get(&make_rating_key("m1", "k1")).unwrap();
        assert!((rating.mu - 0.5).abs() < 1e-6);
        assert!((rating.sigma - (0.5_f64.sqrt() + 0.01)).abs() < 1e-6);
        assert_eq!(rating.uses, 1);
    }

    #[tokio::test]
    async fn record_usage_applies_positive_reward_to_each_id() {
        let loop_ = learning_loop();
        let now = Utc::now();
        loop_
            .record_usage("p1", "k1", "c1", &["m1".to_string(), "m2".to_string()], now)
            .await
            .unwrap();

        let ratings = loop_.load_ratings("p1").await.unwrap();
        assert_eq!(ratings.len(), 2);
        for rating in ratings.values() {
            assert_eq!(rating.uses, 1);
            assert!((rating.mu - 0.5).abs() < 1e-6);
        }

        let interactions = loop_.load_interactions("p1").await.unwrap();
        assert_eq!(interactions.len(), 2);
        assert!(interactions.iter().all(|i| i.reward == Reward::Positive));
    }

    #[tokio::test]
    async fn interaction_log_caps_at_1000_most_recent_in_order() {
        let loop_ = learning_loop();
        let now = Utc::now();
        for i in 0..1500 {
            loop_
                .apply_feedback("p1", "k1", "c1", &[(format!("m{i}"), Reward::Neutral)], now)
                .await
                .unwrap();
        }

        let interactions = loop_.load_interactions("p1").await.unwrap();
        assert_eq!(interactions.len(), MAX_RETAINED_INTERACTIONS);
        assert_eq!(interactions.first().unwrap().memory_id, "m500");
        assert_eq!(interactions.last().unwrap().memory_id, "m1499");
    }

    #[tokio::test]
    async fn feedback_after_selection_is_visible_to_subsequent_loads() {
        let loop_ = learning_loop();
        let now = Utc::now();
        let before = loop_.load_ratings("p1").await.unwrap();
        assert!(before.is_empty());

        loop_
            .apply_feedback("p1", "k1", "c1", &[("m1".into(), Reward::Negative)], now)
            .await
            .unwrap();

        let after = loop_.load_ratings("p1").await.unwrap();
        assert_eq!(after.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_payload_is_recovered_as_empty() {
        let store = Arc::new(InMemorySettingsStore::new());
        store
            .save_setting("memory_ratings_p1", "not json".into())
            .await
            .unwrap();
        let loop_ = LearningLoop::new(store);
        let table = loop_.load_ratings("p1").await.unwrap();
        assert!(table.is_empty());
    }
}
