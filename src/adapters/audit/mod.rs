//! Durable audit log of processed rows

pub mod jsonl;
pub mod postgresql;
pub mod traits;

pub use jsonl::JsonlAuditStore;
pub use postgresql::PostgresAuditStore;
pub use traits::{AuditEntry, AuditStore};

use crate::config::schema::{AuditTarget, QrBatchConfig};
use crate::domain::{QrBatchError, Result};
use std::sync::Arc;

/// Create the audit store selected by `audit_target`
///
/// The PostgreSQL store creates its table on first start.
///
/// # Errors
///
/// Returns an error if the store cannot be created
pub async fn create_audit_store(config: &QrBatchConfig) -> Result<Arc<dyn AuditStore>> {
    match config.audit_target {
        AuditTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                QrBatchError::Configuration(
                    "postgresql configuration is required when audit_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!(table = %pg_config.table, "Creating PostgreSQL audit store");
            let store = PostgresAuditStore::new(pg_config)?;
            store.ensure_schema().await?;
            Ok(Arc::new(store) as Arc<dyn AuditStore>)
        }
        AuditTarget::Jsonl => {
            tracing::info!(path = %config.jsonl.path, "Creating JSON lines audit store");
            let store = JsonlAuditStore::new(&config.jsonl.path)?;
            Ok(Arc::new(store) as Arc<dyn AuditStore>)
        }
    }
}
