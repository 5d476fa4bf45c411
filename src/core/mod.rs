//! Core business logic for qrbatch.
//!
//! # Modules
//!
//! - [`sheet`] - Workbook decoding, header validation and row extraction
//! - [`payload`] - QR plaintext construction
//! - [`crypto`] - Versioned AES-256-GCM token format
//! - [`qr`] - QR rendering to PNG
//! - [`pacing`] - Randomized delay between rows
//! - [`pipeline`] - Per-row state machine and batch orchestration
//!
//! # Row Workflow
//!
//! 1. **Extract**: read the six required fields by column name
//! 2. **Encode**: build the plaintext (template, field list or JSON)
//! 3. **Encrypt**: seal it into a `v1.` token
//! 4. **Render**: QR PNG of the token
//! 5. **Publish**: upload the PNG, get a token-scoped download URL
//! 6. **Dispatch**: multipart POST to the downstream API
//! 7. **Audit**: append the audit document
//! 8. **Pace**: random wait before the next row (not after skipped rows)
//!
//! # Example
//!
//! ```rust,no_run
//! use qrbatch::config::load_config;
//! use qrbatch::core::pipeline::build_orchestrator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("qrbatch.toml")?;
//! let orchestrator = build_orchestrator(&config).await?;
//!
//! let bytes = std::fs::read("actors.xlsx")?;
//! let batch = orchestrator.process(&bytes).await?;
//!
//! println!("ok={} skipped={} errors={}", batch.ok, batch.skipped, batch.errors);
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod pacing;
pub mod payload;
pub mod pipeline;
pub mod qr;
pub mod sheet;
