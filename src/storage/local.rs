use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::{fs, io::AsyncWriteExt};

use super::{ObjectCreator, StorageError};

// Local filesystem storage
#[derive(Clone)]
pub struct LocalStorage {
    base_path: String, // Base directory where files will be stored
}

impl LocalStorage {
    /// Creates a new LocalStorage instance and ensures the base directory exists.
    pub async fn new(base_path: &str) -> Result<Self, StorageError> {
        fs::create_dir_all(base_path).await?;
        Ok(Self {
            base_path: base_path.to_string(),
        })
    }
}

#[async_trait]
impl ObjectCreator for LocalStorage {
    /// Writes content to `base/container/name` on the local filesystem.
    async fn create_object(
        &self,
        content: Bytes,
        name: &str,
        container: &str,
    ) -> Result<String, StorageError> {
        let full_path = format!("{}/{}/{}", self.base_path, container, name);

        // Ensure parent directories exist
        if let Some(parent) = Path::new(&full_path).parent() {
            fs::create_dir_all(parent).await?;
        }

        // Create the file and write content
        let mut file = fs::File::create(&full_path).await?;
        file.write_all(&content).await?;

        tracing::info!("Saved file at {:?}", full_path);

        Ok(full_path)
    }
}
