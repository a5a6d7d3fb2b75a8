//! CDN object storage client.
//!
//! Uploads land in a Bunny-style storage zone and are served from the pull
//! zone; metadata lives in the media store. Only the upload/delete surface
//! is modeled here — protocol details beyond it are the provider's problem.

use crate::config::CdnConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Object storage abstraction for media files.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Uploads bytes to `path` and returns the public CDN URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] when the storage call fails or times out.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;

    /// Deletes the object at `path`. Returns whether the provider confirmed
    /// the delete; callers treat a `false` as best-effort cleanup, not a
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] when the storage call itself fails.
    async fn delete(&self, path: &str) -> Result<bool>;
}

/// Bunny storage-zone client.
pub struct BunnyStorage {
    client: reqwest::Client,
    storage_region: String,
    storage_zone: String,
    storage_password: String,
    pull_zone_url: String,
}

impl BunnyStorage {
    /// Builds a client from CDN configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &CdnConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| Error::Upstream(format!("failed to build CDN client: {e}")))?;
        Ok(Self {
            client,
            storage_region: config.storage_region.clone(),
            storage_zone: config.storage_zone.clone(),
            storage_password: config.storage_password.clone(),
            pull_zone_url: config.pull_zone_url.clone(),
        })
    }

    fn storage_url(&self, path: &str) -> String {
        format!(
            "https://{}/{}/{}",
            self.storage_region, self.storage_zone, path
        )
    }
}

#[async_trait]
impl MediaStorage for BunnyStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        if self.storage_password.is_empty() {
            return Err(Error::Upstream("CDN storage password missing".to_string()));
        }

        let response = self
            .client
            .put(self.storage_url(path))
            .header("AccessKey", &self.storage_password)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("CDN upload failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "CDN upload returned {status}: {detail}"
            )));
        }

        Ok(format!("{}/{path}", self.pull_zone_url))
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        if self.storage_password.is_empty() {
            return Err(Error::Upstream("CDN storage password missing".to_string()));
        }

        let response = self
            .client
            .delete(self.storage_url(path))
            .header("AccessKey", &self.storage_password)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("CDN delete failed: {e}")))?;

        if !response.status().is_success() {
            tracing::warn!(path, status = %response.status(), "CDN delete refused");
            return Ok(false);
        }
        Ok(true)
    }
}

/// In-memory storage double for tests and local development.
#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<HashMap<String, usize>>,
    base_url: String,
}

impl MockStorage {
    /// Creates a mock serving from a fake pull zone.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            base_url: "https://cdn.test".to_string(),
        }
    }

    /// Number of stored objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl MediaStorage for MockStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String> {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(path.to_string(), bytes.len());
        Ok(format!("{}/{path}", self.base_url))
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        Ok(self
            .objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(path)
            .is_some())
    }
}

/// Derives the storage path from a CDN URL minted by [`MediaStorage::upload`].
///
/// Returns `None` when the URL does not contain a recognizable
/// `videos/` or `images/` segment.
#[must_use]
pub fn storage_path_from_url(cdn_url: &str) -> Option<String> {
    for prefix in ["videos/", "images/"] {
        if let Some(idx) = cdn_url.find(prefix) {
            return Some(cdn_url[idx..].to_string());
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_upload_and_delete() {
        let storage = MockStorage::new();
        let url = storage
            .upload("videos/a.mp4", vec![1, 2, 3], "video/mp4")
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.test/videos/a.mp4");
        assert_eq!(storage.object_count(), 1);

        assert!(storage.delete("videos/a.mp4").await.unwrap());
        assert!(!storage.delete("videos/a.mp4").await.unwrap());
    }

    #[test]
    fn path_extraction() {
        assert_eq!(
            storage_path_from_url("https://cdn.test/videos/20260101_clip.mp4").as_deref(),
            Some("videos/20260101_clip.mp4")
        );
        assert_eq!(
            storage_path_from_url("https://cdn.test/images/banner.png").as_deref(),
            Some("images/banner.png")
        );
        assert!(storage_path_from_url("https://cdn.test/other/file.bin").is_none());
    }
}
