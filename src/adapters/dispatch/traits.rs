//! Downstream consumer abstraction

use crate::domain::{DispatchError, Record};
use async_trait::async_trait;

/// Forwards a processed record and its QR image downstream
///
/// One call is one attempt; implementations never retry.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(
        &self,
        record: &Record,
        artifact_url: &str,
        png: &[u8],
    ) -> Result<(), DispatchError>;
}
