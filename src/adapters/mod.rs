//! External system integrations for qrbatch.
//!
//! - [`storage`] - Object storage for QR images and download URLs
//! - [`dispatch`] - Downstream REST consumer (multipart POST)
//! - [`audit`] - Durable audit log (PostgreSQL or JSON lines)
//!
//! # Design Pattern
//!
//! Each integration sits behind a trait ([`storage::ObjectStorage`],
//! [`dispatch::Dispatcher`], [`audit::AuditStore`]) so the row pipeline can be driven
//! by in-memory fakes in tests.

pub mod audit;
pub mod dispatch;
pub mod storage;
