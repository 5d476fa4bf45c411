//! Domain error types
//!
//! This module defines the error hierarchy for qrbatch. Errors are split by scope:
//! batch-level errors abort a run before any row is touched, row-scoped errors are
//! recorded on the row that raised them and the batch carries on.
//! Third-party error types are converted to strings at the boundary.

use thiserror::Error;

/// Main qrbatch error type
///
/// Every fallible operation in the crate returns this type. The variants mirror the
/// stages of the row pipeline so a row failure can be reported by stage.
#[derive(Debug, Error)]
pub enum QrBatchError {
    /// Invalid configuration (bad downstream URL, short passphrase, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The uploaded workbook could not be read or has no worksheet
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Header row does not match the required column set
    #[error("Invalid headers. {0}")]
    Schema(String),

    /// A row has some, but not all, required fields blank
    #[error("{0}")]
    RowValidation(String),

    /// Authenticated encryption of the payload failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// QR rendering failed
    #[error("QR encoding error: {0}")]
    Encoding(String),

    /// Object storage write failed
    #[error("Publish error: {0}")]
    Publish(String),

    /// Downstream API rejected the record or could not be reached
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Durable audit write failed
    #[error("Audit error: {0}")]
    Audit(String),

    /// Database plumbing errors (pool, migration)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl QrBatchError {
    /// Returns true for errors that abort the whole batch
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            QrBatchError::Configuration(_) | QrBatchError::Workbook(_) | QrBatchError::Schema(_)
        )
    }

    /// Stable lowercase tag for logs
    pub fn kind(&self) -> &'static str {
        match self {
            QrBatchError::Configuration(_) => "configuration",
            QrBatchError::Workbook(_) => "workbook",
            QrBatchError::Schema(_) => "schema",
            QrBatchError::RowValidation(_) => "row_validation",
            QrBatchError::Encryption(_) => "encryption",
            QrBatchError::Encoding(_) => "encoding",
            QrBatchError::Publish(_) => "publish",
            QrBatchError::Dispatch(_) => "dispatch",
            QrBatchError::Audit(_) => "audit",
            QrBatchError::Database(_) => "database",
            QrBatchError::Serialization(_) => "serialization",
            QrBatchError::Io(_) => "io",
        }
    }
}

/// Downstream dispatch errors
///
/// The dispatcher never raises on status automatically; a response outside the 2xx
/// range is turned into [`DispatchError::Status`] with the serialized body.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Downstream answered outside [200, 300)
    #[error("API responded {status}: {body}")]
    Status { status: u16, body: String },

    /// Timeout, connection refused, TLS failure, ...
    #[error("API request failed: {0}")]
    Network(String),
}

impl DispatchError {
    /// HTTP status, when the downstream answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::Status { status, .. } => Some(*status),
            DispatchError::Network(_) => None,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for QrBatchError {
    fn from(err: std::io::Error) -> Self {
        QrBatchError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for QrBatchError {
    fn from(err: serde_json::Error) -> Self {
        QrBatchError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for QrBatchError {
    fn from(err: toml::de::Error) -> Self {
        QrBatchError::Configuration(format!("TOML parse error: {err}"))
    }
}
