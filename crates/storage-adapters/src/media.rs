//! # Media Stores
//!
//! Object-store implementations: an in-memory store for tests and dev
//! builds, and a local-filesystem store behind `media-local`.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use mime::Mime;

use domains::error::{DomainError, Result};
use domains::traits::MediaStore;

/// A stored blob plus its visibility flag.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
    pub public: bool,
}

/// In-memory `MediaStore`; objects live in a concurrent map and public
/// URLs are rooted at a configurable base.
pub struct MemoryMediaStore {
    base_url: String,
    objects: DashMap<String, StoredObject>,
}

impl MemoryMediaStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: DashMap::new(),
        }
    }

    /// Number of stored objects (test hook).
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Fetches a stored object by key (test hook).
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn store(&self, key: &str, data: Bytes, content_type: &Mime) -> Result<()> {
        self.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                public: false,
            },
        );
        Ok(())
    }

    async fn make_public(&self, key: &str) -> Result<String> {
        match self.objects.get_mut(key) {
            Some(mut entry) => {
                entry.public = true;
                Ok(format!("{}/{}", self.base_url, key))
            }
            None => Err(DomainError::NotFound("object", key.to_string())),
        }
    }
}

/// Local-filesystem `MediaStore`: blobs land under a root directory and
/// are served from a public URL prefix by the front proxy.
#[cfg(feature = "media-local")]
pub struct LocalMediaStore {
    root: std::path::PathBuf,
    url_prefix: String,
}

#[cfg(feature = "media-local")]
impl LocalMediaStore {
    pub fn new(root: std::path::PathBuf, url_prefix: String) -> Self {
        Self { root, url_prefix }
    }
}

#[cfg(feature = "media-local")]
#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, key: &str, data: Bytes, _content_type: &Mime) -> Result<()> {
        let target = self.root.join(key);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(DomainError::dependency)?;
        }
        tokio::fs::write(&target, &data)
            .await
            .map_err(DomainError::dependency)?;
        Ok(())
    }

    async fn make_public(&self, key: &str) -> Result<String> {
        // Everything under the public root is world-readable already;
        // publishing is just the URL mapping.
        Ok(format!("{}/{}", self.url_prefix, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn make_public_flips_the_flag_and_returns_the_url() {
        let store = MemoryMediaStore::new("https://cdn.campus.example");
        store
            .store("announcements/1-a.png", Bytes::from_static(b"png"), &mime::IMAGE_PNG)
            .await
            .unwrap();

        let url = store.make_public("announcements/1-a.png").await.unwrap();
        assert_eq!(url, "https://cdn.campus.example/announcements/1-a.png");
        assert!(store.object("announcements/1-a.png").unwrap().public);
    }

    #[tokio::test]
    async fn publishing_an_unknown_key_fails() {
        let store = MemoryMediaStore::new("https://cdn.campus.example");
        let err = store.make_public("ghost").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("object", _)));
    }
}
