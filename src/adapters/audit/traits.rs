//! Audit store abstraction and document shape

use crate::domain::{is_blank, Record, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One audit document per processed row
///
/// Every key is always present; a value that was not produced is an explicit
/// `null`, so all documents share one shape. The creation timestamp is assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub codigo: Option<String>,
    pub nombres: Option<String>,
    pub telefono: Option<String>,
    pub denominacion: Option<String>,
    pub estado: Option<String>,
    pub numpases: Option<String>,
    pub qr_url: Option<String>,
    pub token: Option<String>,
}

fn present(value: &str) -> Option<String> {
    if is_blank(value) {
        None
    } else {
        Some(value.to_string())
    }
}

impl AuditEntry {
    pub fn new(record: &Record, qr_url: &str, token: &str) -> Self {
        Self {
            codigo: present(&record.codigo),
            nombres: present(&record.nombres),
            telefono: present(&record.telefono),
            denominacion: present(&record.denominacion),
            estado: present(&record.estado),
            numpases: present(&record.numpases),
            qr_url: present(qr_url),
            token: present(token),
        }
    }
}

/// Append-only durable log of processed rows
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Appends one document
    ///
    /// # Errors
    ///
    /// [`crate::domain::QrBatchError::Audit`] when the write fails.
    async fn append(&self, entry: &AuditEntry) -> Result<()>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
