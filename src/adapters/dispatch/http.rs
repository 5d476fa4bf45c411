//! Multipart POST to the downstream API
//!
//! The request carries exactly four parts:
//!
//! | part         | value                                   |
//! |--------------|-----------------------------------------|
//! | `id_nombre`  | `nombres`                               |
//! | `id_celular` | `telefono`, digits only                 |
//! | `linkPath`   | artifact download URL                   |
//! | `file`       | QR PNG, filename `qr.png`, `image/png`  |

use super::traits::Dispatcher;
use crate::config::schema::validate_http_url;
use crate::config::ApiConfig;
use crate::domain::{DispatchError, QrBatchError, Record, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Single-attempt multipart dispatcher
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    target_url: String,
    client: Client,
}

impl HttpDispatcher {
    /// # Errors
    ///
    /// [`QrBatchError::Configuration`] when the target URL does not parse.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let target_url = config.target_url.trim().to_string();
        validate_http_url("api.target_url", &target_url).map_err(QrBatchError::Configuration)?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                QrBatchError::Configuration(format!("Failed to build API HTTP client: {e}"))
            })?;

        Ok(Self { target_url, client })
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    fn form(record: &Record, artifact_url: &str, png: &[u8]) -> std::result::Result<Form, DispatchError> {
        let file = Part::bytes(png.to_vec())
            .file_name("qr.png")
            .mime_str("image/png")
            .map_err(|e| DispatchError::Network(format!("Invalid file part: {e}")))?;

        Ok(Form::new()
            .text("id_nombre", record.nombres.clone())
            .text("id_celular", record.phone_digits())
            .text("linkPath", artifact_url.to_string())
            .part("file", file))
    }
}

/// Compact JSON re-serialization of a response body, or the JSON string literal of
/// the raw text when it is not JSON
pub fn serialize_body(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => value.to_string(),
        Err(_) => serde_json::Value::String(text.to_string()).to_string(),
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(
        &self,
        record: &Record,
        artifact_url: &str,
        png: &[u8],
    ) -> std::result::Result<(), DispatchError> {
        let form = Self::form(record, artifact_url, png)?;

        let response = self
            .client
            .post(&self.target_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
        let body = serialize_body(&text);

        tracing::info!(status = status.as_u16(), "API responded");
        tracing::debug!(body = %body, "API response body");

        if !status.is_success() {
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
