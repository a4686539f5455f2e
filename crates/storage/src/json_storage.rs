//! JSON file storage implementation.
//!
//! Stores the learning state as a single JSON document under the storage
//! root and keeps a small meta marker next to it (version + updated_at).

use std::path::{Path, PathBuf};
use academy_core::{Catalog, LearningState};
use super::{Result, Storage, StorageError};
use tokio::fs;
use tracing::debug;

const STATE_KEY: &str = "learning-storage";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the directories it needs.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn state_path(&self) -> PathBuf {
        self.root.join(format!("{}.json", STATE_KEY))
    }

    fn meta_path(&self) -> PathBuf {
        self.root.join("meta").join(format!("{}.meta.json", STATE_KEY))
    }

    /// Version of the saved state; 0 when it was never saved.
    pub async fn version(&self) -> Result<u64> {
        let meta: Option<serde_json::Value> = read_json(&self.meta_path()).await?;
        Ok(meta
            .and_then(|m| m.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0))
    }

    /// Read and increment the state version, return the new version.
    async fn bump_version(&self) -> Result<u64> {
        let version = self.version().await.unwrap_or(0) + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(self.meta_path(), serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_state(&mut self, state: &LearningState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(self.state_path(), json.as_bytes()).await?;

        let version = self.bump_version().await?;
        debug!("Saved learning state v{} to {}", version, self.root.display());
        Ok(())
    }

    async fn load_state(&self) -> Result<Option<LearningState>> {
        read_json(&self.state_path()).await
    }

    async fn clear(&mut self) -> Result<()> {
        for path in [self.state_path(), self.meta_path()] {
            fs::remove_file(&path).await.or_else(|e| {
                if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
            })?;
        }
        Ok(())
    }
}

/// Load a course catalog from a JSON file.
pub async fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    read_json(path)
        .await?
        .ok_or_else(|| StorageError::NotFound(path.display().to_string()))
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_core::{CourseId, LectureId, UserId};
    use chrono::Utc;

    #[tokio::test]
    async fn test_save_and_load_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        assert!(storage.load_state().await.unwrap().is_none());
        assert_eq!(storage.version().await.unwrap(), 0);

        let mut state = LearningState::default();
        let (u, c, l) = (UserId::new("u1"), CourseId::new("c1"), LectureId::new("l1"));
        state.watch_entry(&u, &c, &l, Utc::now()).current_time = 120.0;

        storage.save_state(&state).await.unwrap();
        storage.save_state(&state).await.unwrap();
        assert_eq!(storage.version().await.unwrap(), 2);

        let reopened = JsonStorage::new(dir.path()).await.unwrap();
        let loaded = reopened.load_state().await.unwrap().unwrap();
        assert_eq!(loaded.watch(&u, &c, &l).unwrap().current_time, 120.0);
    }

    #[tokio::test]
    async fn test_clear_removes_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.save_state(&LearningState::default()).await.unwrap();

        storage.clear().await.unwrap();
        assert!(storage.load_state().await.unwrap().is_none());
        // Clearing twice is fine.
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_state_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("learning-storage.json"), "{not json").unwrap();

        assert!(matches!(storage.load_state().await, Err(StorageError::Json(_))));
    }

    #[tokio::test]
    async fn test_load_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"courses":[{"id":"1","title":"Web Hacking","lecture_count":2}],
                "lectures":[{"id":"1-1","course_id":"1","duration_secs":600,"order":1}]}"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).await.unwrap();
        assert_eq!(catalog.courses.len(), 1);
        assert_eq!(catalog.lectures_for(&CourseId::new("1")).len(), 1);

        let missing = load_catalog(dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));
    }
}
