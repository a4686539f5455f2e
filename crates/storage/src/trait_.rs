//! Storage trait abstraction.

use async_trait::async_trait;
use academy_core::LearningState;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Persistence port for the learning state of a session.
///
/// The whole state is saved and loaded as one value; backends decide how
/// it is laid out.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Save the state, replacing whatever was stored before.
    async fn save_state(&mut self, state: &LearningState) -> Result<()>;

    /// Load the last saved state. `None` when nothing was saved yet.
    async fn load_state(&self) -> Result<Option<LearningState>>;

    /// Forget the saved state.
    async fn clear(&mut self) -> Result<()>;
}
