//! JSON lines audit store
//!
//! One JSON object per line, appended to a local file. `createdAt` is stamped with
//! the store clock at write time.

use super::traits::{AuditEntry, AuditStore};
use crate::domain::{QrBatchError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry<'a> {
    #[serde(flatten)]
    entry: &'a AuditEntry,
    created_at: DateTime<Utc>,
}

/// Appends audit documents to a file
#[derive(Debug)]
pub struct JsonlAuditStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlAuditStore {
    /// Creates the store, making the parent directory if needed
    ///
    /// # Errors
    ///
    /// [`QrBatchError::Configuration`] when the directory cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                QrBatchError::Configuration(format!(
                    "Failed to create audit directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditStore for JsonlAuditStore {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        let stored = StoredEntry {
            entry,
            created_at: Utc::now(),
        };
        let mut line = serde_json::to_string(&stored)
            .map_err(|e| QrBatchError::Audit(format!("Failed to serialize audit entry: {e}")))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                QrBatchError::Audit(format!(
                    "Failed to open audit log {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| QrBatchError::Audit(format!("Failed to write audit entry: {e}")))?;
        file.flush()
            .await
            .map_err(|e| QrBatchError::Audit(format!("Failed to flush audit log: {e}")))?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "jsonl"
    }
}
