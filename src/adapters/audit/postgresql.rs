//! PostgreSQL audit store
//!
//! Documents go into a single table whose `created_at` column defaults to `now()`,
//! so the timestamp is assigned by the database server.

use super::traits::{AuditEntry, AuditStore};
use crate::config::schema::PostgreSQLConfig;
use crate::domain::{QrBatchError, Result};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::NoTls;

/// DDL for the audit table; `{table}` is replaced with the validated table name
const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS {table} (
    id            BIGSERIAL PRIMARY KEY,
    codigo        TEXT,
    nombres       TEXT,
    telefono      TEXT,
    denominacion  TEXT,
    estado        TEXT,
    numpases      TEXT,
    qr_url        TEXT,
    token         TEXT,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS idx_{table}_codigo ON {table} (codigo);
CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table} (created_at);
";

/// Audit store backed by a deadpool connection pool
pub struct PostgresAuditStore {
    pool: Pool,
    table: String,
}

impl std::fmt::Debug for PostgresAuditStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresAuditStore")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl PostgresAuditStore {
    /// Builds the pool; no connection is opened until first use
    ///
    /// # Errors
    ///
    /// [`QrBatchError::Configuration`] for a bad connection string or TLS setup,
    /// [`QrBatchError::Database`] if the pool cannot be built.
    pub fn new(config: &PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_str()
            .parse()
            .map_err(|e| {
                QrBatchError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = match config.ssl_mode.as_str() {
            "disable" => {
                pg_config.ssl_mode(SslMode::Disable);
                Manager::from_config(pg_config, NoTls, manager_config)
            }
            mode => {
                pg_config.ssl_mode(if mode == "require" {
                    SslMode::Require
                } else {
                    SslMode::Prefer
                });
                let connector = native_tls::TlsConnector::builder().build().map_err(|e| {
                    QrBatchError::Configuration(format!("Failed to build TLS connector: {e}"))
                })?;
                let tls = postgres_native_tls::MakeTlsConnector::new(connector);
                Manager::from_config(pg_config, tls, manager_config)
            }
        };

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| QrBatchError::Database(format!("Failed to create connection pool: {e}")))?;

        Ok(Self {
            pool,
            table: config.table.clone(),
        })
    }

    /// Creates the audit table and its indexes if missing
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.connection().await?;
        client
            .batch_execute(&schema_sql(&self.table))
            .await
            .map_err(|e| QrBatchError::Database(format!("Failed to execute migration: {e}")))?;

        tracing::info!(table = %self.table, "PostgreSQL audit schema ready");
        Ok(())
    }

    async fn connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| QrBatchError::Database(format!("Failed to get connection from pool: {e}")))
    }
}

fn schema_sql(table: &str) -> String {
    SCHEMA_SQL.replace("{table}", table)
}

fn insert_sql(table: &str) -> String {
    format!(
        "INSERT INTO {table} \
         (codigo, nombres, telefono, denominacion, estado, numpases, qr_url, token) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
    )
}

#[async_trait]
impl AuditStore for PostgresAuditStore {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        let client = self
            .connection()
            .await
            .map_err(|e| QrBatchError::Audit(e.to_string()))?;

        client
            .execute(
                &insert_sql(&self.table),
                &[
                    &entry.codigo,
                    &entry.nombres,
                    &entry.telefono,
                    &entry.denominacion,
                    &entry.estado,
                    &entry.numpases,
                    &entry.qr_url,
                    &entry.token,
                ],
            )
            .await
            .map_err(|e| QrBatchError::Audit(format!("Failed to insert audit row: {e}")))?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgresql"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn config(connection_string: &str, ssl_mode: &str) -> PostgreSQLConfig {
        PostgreSQLConfig {
            connection_string: secret_string(connection_string.to_string()),
            max_connections: 2,
            connection_timeout_seconds: 1,
            ssl_mode: ssl_mode.to_string(),
            table: "actors".to_string(),
        }
    }

    #[test]
    fn test_schema_sql_uses_table_name() {
        let sql = schema_sql("actors_2024");
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS actors_2024 ("));
        assert!(sql.contains("idx_actors_2024_codigo"));
        assert!(sql.contains("DEFAULT now()"));
        assert!(!sql.contains("{table}"));
    }

    #[test]
    fn test_insert_sql_binds_eight_values() {
        let sql = insert_sql("actors");
        assert!(sql.starts_with("INSERT INTO actors "));
        assert!(sql.contains("$8"));
        assert!(!sql.contains("$9"));
    }

    #[tokio::test]
    async fn test_pool_builds_without_connecting() {
        let store = PostgresAuditStore::new(&config("postgresql://u:p@localhost:1/qr", "disable")).unwrap();
        assert_eq!(store.name(), "postgresql");
        assert!(!format!("{store:?}").contains("u:p"));
    }

    #[test]
    fn test_invalid_connection_string() {
        let err = PostgresAuditStore::new(&config("postgresql://u:p@localhost:notaport/qr", "disable"))
            .unwrap_err();
        assert!(matches!(err, QrBatchError::Configuration(_)));
    }
}
