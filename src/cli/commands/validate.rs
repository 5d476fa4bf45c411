//! Validate config command implementation

use crate::cli::{EXIT_CONFIGURATION, EXIT_OK};
use crate::config::{load_config, AuditTarget, QrBatchConfig};
use crate::core::payload::PayloadEncoder;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid");
                println!();
                println!("{}", summary(&config));
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                Ok(EXIT_CONFIGURATION)
            }
        }
    }
}

/// Human readable summary with every secret redacted
pub fn summary(config: &QrBatchConfig) -> String {
    let mut lines = vec![
        "Configuration Summary:".to_string(),
        format!("  Log Level: {}", config.application.log_level),
        format!("  API Target: {}", config.api.target_url),
        format!("  API Timeout: {}s", config.api.timeout_seconds),
        "  QR Secret Key: [REDACTED]".to_string(),
    ];

    let payload = PayloadEncoder::from_config(config.qr.template.as_deref(), &config.qr.fields)
        .map(|encoder| encoder.mode())
        .unwrap_or("invalid");
    lines.push(format!("  Payload Mode: {payload}"));
    lines.push(format!("  QR Size: {}px, margin {}", config.qr.width, config.qr.margin));
    lines.push(format!(
        "  Pacing: {}-{} ms",
        config.pacing.min_delay_ms, config.pacing.max_delay_ms
    ));
    lines.push(format!("  Storage Bucket: {}", config.storage.bucket));
    lines.push(format!("  Storage Prefix: {}", config.storage.prefix));

    match config.audit_target {
        AuditTarget::PostgreSQL => {
            lines.push("  Audit Target: PostgreSQL".to_string());
            if let Some(ref pg) = config.postgresql {
                let host = pg
                    .connection_string
                    .expose_secret()
                    .as_str()
                    .split('@')
                    .next_back()
                    .unwrap_or("***")
                    .to_string();
                lines.push(format!("  PostgreSQL Host: {host}"));
                lines.push(format!("  PostgreSQL Table: {}", pg.table));
            }
        }
        AuditTarget::Jsonl => {
            lines.push("  Audit Target: JSON lines".to_string());
            lines.push(format!("  Audit File: {}", config.jsonl.path));
        }
    }

    lines.push(format!("  Server Bind: {}", config.server.bind));
    lines.join("\n")
}
