//! Logging and observability
//!
//! Structured logging with:
//! - Console output with an `EnvFilter`
//! - Optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use qrbatch::logging::init_logging;
//! use qrbatch::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(row = 2, "Row processed");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a row reaching a terminal state
///
/// # Example
///
/// ```no_run
/// use qrbatch::log_row_outcome;
/// use qrbatch::domain::RowResult;
///
/// let result = RowResult::skipped(3);
/// log_row_outcome!(&result);
/// ```
#[macro_export]
macro_rules! log_row_outcome {
    ($result:expr) => {
        match $result.status {
            $crate::domain::RowStatus::Error => tracing::warn!(
                row = $result.row,
                status = "error",
                error = $result.error.as_deref().unwrap_or_default(),
                "Row finished"
            ),
            $crate::domain::RowStatus::Ok => tracing::info!(
                row = $result.row,
                status = "ok",
                qr_url = $result.qr_url.as_deref().unwrap_or_default(),
                "Row finished"
            ),
            $crate::domain::RowStatus::Skipped => {
                tracing::debug!(row = $result.row, status = "skipped", "Row finished")
            }
        }
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use qrbatch::log_error_with_context;
/// use qrbatch::domain::QrBatchError;
///
/// let error = QrBatchError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            kind = $error.kind(),
            context = $context,
            "Error occurred"
        );
    };
}
