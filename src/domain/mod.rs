//! Domain models and types for qrbatch.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Record types** ([`RequiredField`], [`NormalizedHeader`], [`Record`])
//! - **Outcomes** ([`RowResult`], [`RowStatus`], [`BatchResult`])
//! - **Error types** ([`QrBatchError`], [`DispatchError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Column names are a closed enumeration, so a typo in a field name is a compile
//! error rather than a silently empty lookup:
//!
//! ```rust
//! use qrbatch::domain::{Record, RequiredField};
//!
//! let record = Record {
//!     codigo: "A1".into(),
//!     nombres: "Juan".into(),
//!     ..Default::default()
//! };
//! assert_eq!(record.get(RequiredField::Codigo), "A1");
//! ```

pub mod errors;
pub mod outcome;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{DispatchError, QrBatchError};
pub use outcome::{BatchResult, RowResult, RowStatus};
pub use record::{is_blank, NormalizedHeader, Record, RequiredField};
pub use result::Result;
