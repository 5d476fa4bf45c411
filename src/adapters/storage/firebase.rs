//! Cloud Storage upload over the JSON API
//!
//! Objects are sent with a single `multipart/related` request: a JSON metadata part
//! followed by the media part. This is the same call the Firebase admin SDK issues
//! for a non-resumable save.

use super::traits::{ObjectMetadata, ObjectStorage};
use crate::config::{SecretString, StorageConfig};
use crate::domain::{QrBatchError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde_json::json;
use std::time::Duration;

/// Bucket client for the Cloud Storage JSON upload API
pub struct FirebaseStorage {
    bucket: String,
    upload_base_url: String,
    access_token: Option<SecretString>,
    client: Client,
}

impl std::fmt::Debug for FirebaseStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseStorage")
            .field("bucket", &self.bucket)
            .field("upload_base_url", &self.upload_base_url)
            .finish_non_exhaustive()
    }
}

impl FirebaseStorage {
    /// Creates the client
    ///
    /// # Errors
    ///
    /// [`QrBatchError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                QrBatchError::Configuration(format!("Failed to build storage HTTP client: {e}"))
            })?;

        Ok(Self {
            bucket: config.bucket.trim().to_string(),
            upload_base_url: config.upload_base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            client,
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/b/{}/o?uploadType=multipart",
            self.upload_base_url, self.bucket
        )
    }
}

/// Builds a `multipart/related` body: JSON metadata part, then the media part
fn related_body(boundary: &str, metadata: &serde_json::Value, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 512);
    body.extend_from_slice(
        format!("--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("--{boundary}\r\nContent-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[async_trait]
impl ObjectStorage for FirebaseStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn save(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<()> {
        let boundary = format!("qrbatch-{}", uuid::Uuid::new_v4().simple());
        let object = json!({
            "name": path,
            "contentType": content_type,
            "metadata": metadata,
        });
        let size = bytes.len();
        let body = related_body(&boundary, &object, content_type, &bytes);

        let mut request = self
            .client
            .post(self.upload_url())
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body);
        if let Some(ref token) = self.access_token {
            request = request.bearer_auth(token.expose_secret().as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| QrBatchError::Publish(format!("Upload of {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QrBatchError::Publish(format!(
                "Upload of {path} rejected with status {status}: {body}"
            )));
        }

        tracing::debug!(bucket = %self.bucket, path, size, "Object stored");
        Ok(())
    }
}
