// Submodules for local file system storage and S3 storage
mod local;
mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::{
    config::Config,
    storage::{local::LocalStorage, s3::S3Storage},
};

// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error), // Wraps standard I/O errors

    #[error("Upload Error: {0}")]
    UploadError(String), // Errors during upload to storage

    #[error("Storage unavailable: {0}")]
    Unavailable(String), // Backend unreachable or credentials rejected at startup
}

/// Narrow write-only capability the pending-upload tracker hands off to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectCreator: Send + Sync {
    /// Store `content` under `name` inside `container`.
    /// Returns the full path or key of the created object.
    async fn create_object(
        &self,
        content: Bytes,
        name: &str,
        container: &str,
    ) -> Result<String, StorageError>;
}

// Enum to represent storage backends
#[derive(Clone)]
pub enum StorageBackend {
    Local(LocalStorage), // Local filesystem storage
    S3(S3Storage),       // AWS S3 or MinIO storage
}

// Implement ObjectCreator trait for StorageBackend enum
// Delegates calls to the chosen backend
#[async_trait]
impl ObjectCreator for StorageBackend {
    async fn create_object(
        &self,
        content: Bytes,
        name: &str,
        container: &str,
    ) -> Result<String, StorageError> {
        match self {
            StorageBackend::Local(s) => s.create_object(content, name, container).await,
            StorageBackend::S3(s) => s.create_object(content, name, container).await,
        }
    }
}

// Initialize the storage backend based on config.
// Any failure here is fatal: the bot refuses to start with broken storage.
pub async fn init_storage(config: &Config) -> Result<StorageBackend, StorageError> {
    if config.use_s3 {
        info!("Initializing S3 storage");
        Ok(StorageBackend::S3(S3Storage::new(config).await?))
    } else {
        info!("Initializing Local storage");
        Ok(StorageBackend::Local(
            LocalStorage::new(&config.local_storage_dir).await?,
        ))
    }
}
