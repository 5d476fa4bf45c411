//! Configuration management for qrbatch.
//!
//! qrbatch reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `QRBATCH_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! target_url = "https://api.example.com/actors"
//!
//! [qr]
//! secret_key = "${QR_SECRET_KEY}"
//! template = "{{codigo}}-{{nombres}}"
//!
//! [storage]
//! bucket = "my-project.appspot.com"
//! access_token = "${STORAGE_TOKEN}"
//!
//! audit_target = "postgresql"
//!
//! [postgresql]
//! connection_string = "${DATABASE_URL}"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use qrbatch::config::load_config;
//!
//! # fn example() {
//! match load_config("qrbatch.toml") {
//!     Ok(config) => println!("Downstream API: {}", config.api.target_url),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_str};
pub use schema::{
    ApiConfig, ApplicationConfig, AuditTarget, JsonlConfig, LoggingConfig, PacingConfig,
    PostgreSQLConfig, QrBatchConfig, QrConfig, ServerConfig, StorageConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
