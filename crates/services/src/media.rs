//! # Media Service
//!
//! The image-attachment workflow: validate the whole batch before touching
//! the object store, upload concurrently, then collect the public URLs in
//! input order.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use futures_util::future::try_join_all;
use mime::Mime;
use tracing::debug;

use domains::error::{DomainError, Result};
use domains::traits::MediaStore;

/// One uploaded blob as received from the multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Mime,
    pub data: Bytes,
}

/// Uploads image batches on behalf of the announcement screens.
#[derive(Clone)]
pub struct UploadService {
    media: Arc<dyn MediaStore>,
}

impl UploadService {
    pub fn new(media: Arc<dyn MediaStore>) -> Self {
        Self { media }
    }

    /// Uploads a batch of images and returns their public URLs in input
    /// order.
    ///
    /// The batch is all-or-nothing: every blob is MIME-checked before the
    /// first upload starts, and any single upload failure fails the whole
    /// call, so no partial URL list ever reaches an announcement. Callers
    /// retry the entire batch. In the edit case the caller appends these
    /// URLs after the ones it retained.
    pub async fn upload_images(&self, uploads: Vec<ImageUpload>) -> Result<Vec<String>> {
        // Reject the whole batch before any upload is attempted.
        for upload in &uploads {
            if upload.content_type.type_() != mime::IMAGE {
                return Err(DomainError::Validation(format!(
                    "file {} is not an image",
                    upload.file_name
                )));
            }
        }

        debug!(count = uploads.len(), "uploading image batch");
        let urls = try_join_all(uploads.into_iter().map(|upload| {
            let media = Arc::clone(&self.media);
            async move {
                let key = storage_key(&upload.file_name, Utc::now().timestamp_millis());
                media.store(&key, upload.data, &upload.content_type).await?;
                media.make_public(&key).await
            }
        }))
        .await?;

        Ok(urls)
    }
}

/// Derives a collision-resistant storage key from the upload time and a
/// sanitized filename: anything outside `[A-Za-z0-9.-]` becomes `_`.
fn storage_key(file_name: &str, millis: i64) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("announcements/{millis}-{sanitized}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::traits::MockMediaStore;

    fn upload(name: &str, content_type: Mime) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type,
            data: Bytes::from_static(b"blob"),
        }
    }

    #[test]
    fn storage_keys_keep_dots_and_dashes_only() {
        assert_eq!(
            storage_key("my photo (1).png", 1700000000000),
            "announcements/1700000000000-my_photo__1_.png"
        );
        assert_eq!(
            storage_key("plain-name.jpg", 42),
            "announcements/42-plain-name.jpg"
        );
    }

    #[tokio::test]
    async fn urls_come_back_in_input_order() {
        let mut media = MockMediaStore::new();
        media.expect_store().returning(|_, _, _| Ok(()));
        media
            .expect_make_public()
            .returning(|key| Ok(format!("https://cdn/{key}")));

        let service = UploadService::new(Arc::new(media));
        let urls = service
            .upload_images(vec![
                upload("a.png", mime::IMAGE_PNG),
                upload("b.png", mime::IMAGE_PNG),
                upload("c.png", mime::IMAGE_PNG),
            ])
            .await
            .unwrap();

        assert_eq!(urls.len(), 3);
        assert!(urls[0].ends_with("a.png"));
        assert!(urls[1].ends_with("b.png"));
        assert!(urls[2].ends_with("c.png"));
    }

    #[tokio::test]
    async fn one_bad_blob_fails_the_batch_before_any_upload() {
        // No store/make_public expectations: the mock panics on any call.
        let media = MockMediaStore::new();

        let service = UploadService::new(Arc::new(media));
        let err = service
            .upload_images(vec![
                upload("ok.png", mime::IMAGE_PNG),
                upload("notes.txt", mime::TEXT_PLAIN),
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(message) if message.contains("notes.txt")));
    }

    #[tokio::test]
    async fn a_single_upload_failure_fails_the_whole_attach() {
        let mut media = MockMediaStore::new();
        media.expect_store().returning(|key, _, _| {
            if key.ends_with("b.png") {
                Err(DomainError::Dependency("object store refused".to_string()))
            } else {
                Ok(())
            }
        });
        media
            .expect_make_public()
            .returning(|key| Ok(format!("https://cdn/{key}")));

        let service = UploadService::new(Arc::new(media));
        let err = service
            .upload_images(vec![
                upload("a.png", mime::IMAGE_PNG),
                upload("b.png", mime::IMAGE_PNG),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Dependency(_)));
    }
}
