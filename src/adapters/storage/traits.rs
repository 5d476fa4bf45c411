//! Object storage abstraction

use crate::domain::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Custom object metadata (string to string)
pub type ObjectMetadata = BTreeMap<String, String>;

/// Write side of an object store
///
/// Implementations perform a single, non-resumable upload per call and report any
/// failure as [`crate::domain::QrBatchError::Publish`].
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Bucket the objects land in
    fn bucket(&self) -> &str;

    /// Stores `bytes` under `path`, overwriting nothing the caller did not name
    async fn save(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<()>;
}
