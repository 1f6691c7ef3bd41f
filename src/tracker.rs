use std::collections::HashMap;

use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::{
    error::AppError,
    storage::ObjectCreator,
    utils::{derive_object_name, name_escapes_container},
};

/// Tracks at most one not-yet-named photo per user and turns it into an
/// object-store upload once the user supplies a name.
///
/// The map is owned by this struct alone and lives as long as the process;
/// nothing is persisted across restarts.
pub struct PendingUploads<S> {
    pending: Mutex<HashMap<u64, Bytes>>,
    storage: S,
    container: String,
}

impl<S: ObjectCreator> PendingUploads<S> {
    pub fn new(storage: S, container: String) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            storage,
            container,
        }
    }

    /// Remember the latest photo for a user.
    /// A photo sent before the previous one was named silently replaces it.
    pub async fn record_photo(&self, user_id: u64, content: Bytes) {
        let mut pending = self.pending.lock().await;
        pending.insert(user_id, content);
    }

    /// Consume the pending photo for a user and upload it as `<name>.jpg`.
    ///
    /// The entry is removed before the upload starts, so of two concurrent
    /// naming messages for the same user exactly one wins; the other sees
    /// `NoPendingUpload`. An upload failure does not restore the entry: the
    /// photo is gone and the user has to resend it.
    pub async fn complete_upload(&self, user_id: u64, raw_name: &str) -> Result<String, AppError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyName);
        }
        // A name with path components would land outside the container
        // (local paths and S3 key prefixes alike).
        if name_escapes_container(name) {
            return Err(AppError::InvalidName);
        }

        let content = {
            let mut pending = self.pending.lock().await;
            pending.remove(&user_id).ok_or(AppError::NoPendingUpload)?
        };

        let object_name = derive_object_name(name);
        let stored_path = self
            .storage
            .create_object(content, &object_name, &self.container)
            .await
            .map_err(|e| {
                error!("Upload of {} for user {} failed: {}", object_name, user_id, e);
                AppError::UploadFailure(e)
            })?;

        info!("Uploaded {} for user {} to {}", object_name, user_id, stored_path);
        Ok(object_name)
    }

    /// Whether a user currently has an unnamed photo waiting.
    pub async fn has_pending(&self, user_id: u64) -> bool {
        self.pending.lock().await.contains_key(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{MockObjectCreator, StorageError};

    fn uploads_nothing() -> MockObjectCreator {
        let mut storage = MockObjectCreator::new();
        storage.expect_create_object().times(0);
        storage
    }

    #[tokio::test]
    async fn naming_without_photo_is_rejected() {
        let tracker = PendingUploads::new(uploads_nothing(), "photos".into());

        let err = tracker.complete_upload(99, "cat").await.unwrap_err();
        assert!(matches!(err, AppError::NoPendingUpload));
        assert!(!tracker.has_pending(99).await);
    }

    #[tokio::test]
    async fn second_photo_replaces_the_first() {
        let mut storage = MockObjectCreator::new();
        storage
            .expect_create_object()
            .withf(|content, name, container| {
                content.as_ref() == b"second" && name == "x.jpg" && container == "photos"
            })
            .times(1)
            .returning(|_, name, container| Ok(format!("{}/{}", container, name)));
        let tracker = PendingUploads::new(storage, "photos".into());

        tracker.record_photo(7, Bytes::from_static(b"first")).await;
        tracker.record_photo(7, Bytes::from_static(b"second")).await;

        let name = tracker.complete_upload(7, "x").await.unwrap();
        assert_eq!(name, "x.jpg");
    }

    #[tokio::test]
    async fn entry_is_consumed_by_the_first_completion() {
        let mut storage = MockObjectCreator::new();
        storage
            .expect_create_object()
            .times(1)
            .returning(|_, name, _| Ok(name.to_string()));
        let tracker = PendingUploads::new(storage, "photos".into());

        tracker.record_photo(7, Bytes::from_static(b"img")).await;
        tracker.complete_upload(7, "x").await.unwrap();

        let err = tracker.complete_upload(7, "y").await.unwrap_err();
        assert!(matches!(err, AppError::NoPendingUpload));
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let tracker = PendingUploads::new(uploads_nothing(), "photos".into());

        tracker.record_photo(1, Bytes::from_static(b"img")).await;

        let err = tracker.complete_upload(2, "x").await.unwrap_err();
        assert!(matches!(err, AppError::NoPendingUpload));
        assert!(tracker.has_pending(1).await);
    }

    #[tokio::test]
    async fn whitespace_only_name_keeps_the_photo_pending() {
        let tracker = PendingUploads::new(uploads_nothing(), "photos".into());

        tracker.record_photo(7, Bytes::from_static(b"img")).await;

        let err = tracker.complete_upload(7, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::EmptyName));
        assert!(tracker.has_pending(7).await);
    }

    #[tokio::test]
    async fn traversal_name_is_rejected_without_consuming_the_photo() {
        let tracker = PendingUploads::new(uploads_nothing(), "photos".into());

        tracker.record_photo(7, Bytes::from_static(b"img")).await;

        let err = tracker.complete_upload(7, "../../escape").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidName));
        assert!(tracker.has_pending(7).await);
    }

    #[tokio::test]
    async fn name_with_separator_is_rejected_without_consuming_the_photo() {
        let tracker = PendingUploads::new(uploads_nothing(), "photos".into());

        tracker.record_photo(7, Bytes::from_static(b"img")).await;

        let err = tracker.complete_upload(7, "nested/name").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidName));
        assert!(tracker.has_pending(7).await);
    }

    #[tokio::test]
    async fn uploads_the_recorded_bytes_under_the_derived_name() {
        let photo = Bytes::from_static(b"\xFF\xD8\xFF\xE0");
        let expected = photo.clone();

        let mut storage = MockObjectCreator::new();
        storage
            .expect_create_object()
            .withf(move |content, name, container| {
                *content == expected && name == "cat.jpg" && container == "drive-folder"
            })
            .times(1)
            .returning(|_, name, container| Ok(format!("{}/{}", container, name)));
        let tracker = PendingUploads::new(storage, "drive-folder".into());

        tracker.record_photo(42, photo).await;

        let name = tracker.complete_upload(42, "cat").await.unwrap();
        assert_eq!(name, "cat.jpg");
        assert!(!tracker.has_pending(42).await);
    }

    #[tokio::test]
    async fn name_is_trimmed_before_upload() {
        let mut storage = MockObjectCreator::new();
        storage
            .expect_create_object()
            .withf(|_, name, _| name == "trip.jpg")
            .times(1)
            .returning(|_, name, _| Ok(name.to_string()));
        let tracker = PendingUploads::new(storage, "photos".into());

        tracker.record_photo(7, Bytes::from_static(b"img")).await;
        assert_eq!(tracker.complete_upload(7, "  trip  ").await.unwrap(), "trip.jpg");
    }

    #[tokio::test]
    async fn failed_upload_loses_the_photo() {
        let mut storage = MockObjectCreator::new();
        storage
            .expect_create_object()
            .times(1)
            .returning(|_, _, _| Err(StorageError::UploadError("quota exceeded".into())));
        let tracker = PendingUploads::new(storage, "photos".into());

        tracker.record_photo(7, Bytes::from_static(b"img")).await;

        let err = tracker.complete_upload(7, "x").await.unwrap_err();
        assert!(matches!(err, AppError::UploadFailure(_)));

        // Entry was consumed before the upload; the user must resend.
        let err = tracker.complete_upload(7, "x").await.unwrap_err();
        assert!(matches!(err, AppError::NoPendingUpload));
    }

    #[tokio::test]
    async fn concurrent_completions_consume_exactly_once() {
        let mut storage = MockObjectCreator::new();
        storage
            .expect_create_object()
            .times(1)
            .returning(|_, name, _| Ok(name.to_string()));
        let tracker = Arc::new(PendingUploads::new(storage, "photos".into()));

        tracker.record_photo(7, Bytes::from_static(b"img")).await;

        let a = tokio::spawn({
            let tracker = tracker.clone();
            async move { tracker.complete_upload(7, "x").await }
        });
        let b = tokio::spawn({
            let tracker = tracker.clone();
            async move { tracker.complete_upload(7, "y").await }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let loser = match (a, b) {
            (Ok(_), Err(e)) | (Err(e), Ok(_)) => e,
            (a, b) => panic!("expected exactly one winner, got {:?} and {:?}", a, b),
        };
        assert!(matches!(loser, AppError::NoPendingUpload));
    }
}
