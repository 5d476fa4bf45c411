//! QR plaintext construction
//!
//! Three mutually exclusive shapes, chosen once from configuration:
//!
//! 1. a template with `{{field}}` placeholders,
//! 2. an ordered field list rendered as `field=value;field=value`,
//! 3. the whole record as JSON (default).

use crate::domain::{QrBatchError, Record, Result};
use regex::{Captures, Regex};

/// Placeholder names are ASCII word characters; anything else is left as written
const PLACEHOLDER_PATTERN: &str = r"\{\{([A-Za-z0-9_]+)\}\}";

/// Renders a [`Record`] into the plaintext that gets encrypted
#[derive(Debug, Clone)]
pub enum PayloadEncoder {
    Template { template: String, placeholder: Regex },
    Fields(Vec<String>),
    Json,
}

impl PayloadEncoder {
    /// Picks the encoding: a non-empty template wins over a non-empty field list,
    /// otherwise JSON
    pub fn from_config(template: Option<&str>, fields: &[String]) -> Result<Self> {
        if let Some(template) = template.filter(|t| !t.is_empty()) {
            let placeholder = Regex::new(PLACEHOLDER_PATTERN).map_err(|e| {
                QrBatchError::Configuration(format!("Invalid placeholder pattern: {e}"))
            })?;
            return Ok(Self::Template {
                template: template.to_string(),
                placeholder,
            });
        }
        if !fields.is_empty() {
            return Ok(Self::Fields(fields.to_vec()));
        }
        Ok(Self::Json)
    }

    /// Short name of the active branch, for logs
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Template { .. } => "template",
            Self::Fields(_) => "fields",
            Self::Json => "json",
        }
    }

    pub fn encode(&self, record: &Record) -> Result<String> {
        match self {
            Self::Template {
                template,
                placeholder,
            } => Ok(placeholder
                .replace_all(template, |caps: &Captures<'_>| {
                    record.get_by_name(&caps[1]).unwrap_or_default().to_string()
                })
                .into_owned()),
            Self::Fields(fields) => Ok(fields
                .iter()
                .map(|name| {
                    let value = record.get_by_name(name).unwrap_or_default();
                    format!("{name}={}", value.replace(';', ","))
                })
                .collect::<Vec<_>>()
                .join(";")),
            Self::Json => Ok(serde_json::to_string(record)?),
        }
    }
}
