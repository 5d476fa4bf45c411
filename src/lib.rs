//! # qrbatch - encrypted QR codes from spreadsheet rows
//!
//! qrbatch reads an uploaded workbook of actors, seals each row into an encrypted
//! token, renders the token as a QR image, publishes the image to object storage,
//! hands the record to a downstream REST API and keeps an audit trail.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`server`] - HTTP upload endpoint
//! - [`core`] - Business logic (sheet parsing, payload, crypto, QR, pacing, pipeline)
//! - [`adapters`] - External integrations (object storage, downstream API, audit store)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qrbatch::config::load_config;
//! use qrbatch::core::pipeline::build_orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("qrbatch.toml")?;
//!     let orchestrator = build_orchestrator(&config).await?;
//!
//!     let bytes = std::fs::read("actors.xlsx")?;
//!     let batch = orchestrator.process(&bytes).await?;
//!
//!     println!("{} ok, {} skipped, {} errors", batch.ok, batch.skipped, batch.errors);
//!     Ok(())
//! }
//! ```
//!
//! ## Row outcomes
//!
//! A batch either fails as a whole (configuration, unreadable workbook, wrong
//! headers) before any row is touched, or it visits every data row and reports one
//! [`domain::RowResult`] per row. A row failure never stops the batch.
//!
//! ## Tokens
//!
//! Tokens are `v1.<iv>.<salt>.<ciphertext+tag>`, each part base64url without padding,
//! sealed with AES-256-GCM under a PBKDF2-SHA256 key:
//!
//! ```rust
//! use qrbatch::config::secret_string;
//! use qrbatch::core::crypto::TokenCipher;
//!
//! let cipher = TokenCipher::new(&secret_string("correct horse battery staple".into())).unwrap();
//! let token = cipher.encrypt("codigo=A1").unwrap();
//! assert!(token.starts_with("v1."));
//! assert_eq!(token.split('.').count(), 4);
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
