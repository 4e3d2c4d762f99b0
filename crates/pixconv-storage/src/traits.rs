//! Storage abstraction trait

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Where uploaded files end up.
///
/// The caller is responsible for sanitising `filename` first; backends still
/// refuse keys that would escape their root.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `filename`, replacing any existing file. Returns the key.
    async fn upload(&self, filename: &str, content_type: &str, data: Bytes) -> StorageResult<String>;
}
