//! QR artifact publication
//!
//! Every published object gets a random download token stored in its metadata; the
//! returned URL embeds that token, so it grants read access without further
//! credentials.

use super::traits::{ObjectMetadata, ObjectStorage};
use crate::config::StorageConfig;
use crate::domain::{QrBatchError, Result};
use std::sync::Arc;
use url::Url;

/// Metadata key the download endpoint checks the `token` query parameter against
pub const DOWNLOAD_TOKEN_METADATA_KEY: &str = "firebaseStorageDownloadTokens";
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Uploads QR images and hands back token-scoped download URLs
#[derive(Clone)]
pub struct ArtifactPublisher {
    storage: Arc<dyn ObjectStorage>,
    download_base_url: Url,
    prefix: String,
}

impl std::fmt::Debug for ArtifactPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactPublisher")
            .field("bucket", &self.storage.bucket())
            .field("download_base_url", &self.download_base_url.as_str())
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl ArtifactPublisher {
    /// # Errors
    ///
    /// [`QrBatchError::Configuration`] if the download base URL is unusable.
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        download_base_url: &str,
        prefix: &str,
    ) -> Result<Self> {
        let download_base_url = Url::parse(download_base_url.trim()).map_err(|e| {
            QrBatchError::Configuration(format!(
                "storage.download_base_url is invalid: \"{download_base_url}\" ({e})"
            ))
        })?;
        if download_base_url.cannot_be_a_base() {
            return Err(QrBatchError::Configuration(format!(
                "storage.download_base_url cannot be a base URL: \"{download_base_url}\""
            )));
        }

        Ok(Self {
            storage,
            download_base_url,
            prefix: prefix.trim_matches('/').to_string(),
        })
    }

    pub fn from_config(storage: Arc<dyn ObjectStorage>, config: &StorageConfig) -> Result<Self> {
        Self::new(storage, &config.download_base_url, &config.prefix)
    }

    /// Object key for a sheet row: `<prefix>/qr_row_<row>_<unix millis>.png`
    pub fn object_key(&self, row: usize) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        if self.prefix.is_empty() {
            format!("qr_row_{row}_{millis}.png")
        } else {
            format!("{}/qr_row_{row}_{millis}.png", self.prefix)
        }
    }

    /// Uploads `png` under `key` and returns its download URL
    ///
    /// # Errors
    ///
    /// [`QrBatchError::Publish`] on any storage failure.
    pub async fn publish(&self, png: Vec<u8>, key: &str) -> Result<String> {
        let token = uuid::Uuid::new_v4().to_string();
        let mut metadata = ObjectMetadata::new();
        metadata.insert(DOWNLOAD_TOKEN_METADATA_KEY.to_string(), token.clone());

        self.storage
            .save(key, png, PNG_CONTENT_TYPE, &metadata)
            .await?;

        self.download_url(key, &token)
    }

    /// `<base>/b/<bucket>/o/<url-encoded key>?alt=media&token=<token>`
    pub fn download_url(&self, key: &str, token: &str) -> Result<String> {
        let mut url = self.download_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| QrBatchError::Publish("Download base URL has no path".to_string()))?
            .pop_if_empty()
            .push("b")
            .push(self.storage.bucket())
            .push("o")
            .push(key);
        url.query_pairs_mut()
            .clear()
            .append_pair("alt", "media")
            .append_pair("token", token);
        Ok(url.into())
    }
}
