//! In-memory storage, for tests and throwaway sessions.

use std::sync::Arc;
use academy_core::LearningState;
use tokio::sync::Mutex;
use super::{Result, Storage};

/// Storage that keeps the state in memory.
///
/// Clones share the same slot, so a test can hand one clone to a service
/// and inspect what it saved through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<LearningState>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-loaded with a state.
    pub fn with_state(state: LearningState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(state))),
            saves: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of saves performed so far.
    pub async fn save_count(&self) -> usize {
        *self.saves.lock().await
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn save_state(&mut self, state: &LearningState) -> Result<()> {
        *self.slot.lock().await = Some(state.clone());
        *self.saves.lock().await += 1;
        Ok(())
    }

    async fn load_state(&self) -> Result<Option<LearningState>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn clear(&mut self) -> Result<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_core::{CourseId, CourseProgress, UserId};
    use chrono::Utc;

    #[tokio::test]
    async fn test_clones_share_state() {
        let storage = MemoryStorage::new();
        let mut writer = storage.clone();

        let mut state = LearningState::default();
        state.enrolled_courses.push(CourseProgress::enrolled(
            UserId::new("u1"),
            CourseId::new("c1"),
            3,
            0.0,
            Utc::now(),
        ));
        writer.save_state(&state).await.unwrap();

        let loaded = storage.load_state().await.unwrap().unwrap();
        assert_eq!(loaded.enrolled_courses.len(), 1);
        assert_eq!(storage.save_count().await, 1);

        writer.clear().await.unwrap();
        assert!(storage.load_state().await.unwrap().is_none());
    }
}
