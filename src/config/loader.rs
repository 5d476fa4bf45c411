//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AuditTarget, QrBatchConfig};
use super::secret::secret_string;
use crate::domain::errors::QrBatchError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into [`QrBatchConfig`]
/// 4. Applies environment variable overrides (QRBATCH_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Every failure is reported as [`QrBatchError::Configuration`].
///
/// # Examples
///
/// ```no_run
/// use qrbatch::config::loader::load_config;
///
/// let config = load_config("qrbatch.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<QrBatchConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(QrBatchError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        QrBatchError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Same as [`load_config`], from an in-memory TOML document
pub fn load_config_str(contents: &str) -> Result<QrBatchConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: QrBatchConfig = toml::from_str(&contents)
        .map_err(|e| QrBatchError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        QrBatchError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported at once.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| QrBatchError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(QrBatchError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the QRBATCH_* prefix
///
/// Environment variables follow the pattern QRBATCH_<SECTION>_<KEY>, for example
/// QRBATCH_API_TARGET_URL or QRBATCH_QR_SECRET_KEY.
fn apply_env_overrides(config: &mut QrBatchConfig) {
    if let Ok(val) = std::env::var("QRBATCH_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Downstream API
    if let Ok(val) = std::env::var("QRBATCH_API_TARGET_URL") {
        config.api.target_url = val.trim().to_string();
    }
    if let Ok(val) = std::env::var("QRBATCH_API_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.api.timeout_seconds = secs;
        }
    }

    // QR payload
    if let Ok(val) = std::env::var("QRBATCH_QR_SECRET_KEY") {
        config.qr.secret_key = secret_string(val.trim().to_string());
    }
    if let Ok(val) = std::env::var("QRBATCH_QR_TEMPLATE") {
        config.qr.template = if val.is_empty() { None } else { Some(val) };
    }
    if let Ok(val) = std::env::var("QRBATCH_QR_FIELDS") {
        config.qr.fields = parse_field_list(&val);
    }

    // Pacing
    if let Ok(val) = std::env::var("QRBATCH_PACING_MIN_DELAY_MS") {
        if let Ok(ms) = val.parse() {
            config.pacing.min_delay_ms = ms;
        }
    }
    if let Ok(val) = std::env::var("QRBATCH_PACING_MAX_DELAY_MS") {
        if let Ok(ms) = val.parse() {
            config.pacing.max_delay_ms = ms;
        }
    }

    // Storage
    if let Ok(val) = std::env::var("QRBATCH_STORAGE_BUCKET") {
        config.storage.bucket = val;
    }
    if let Ok(val) = std::env::var("QRBATCH_STORAGE_ACCESS_TOKEN") {
        config.storage.access_token = Some(secret_string(val));
    }

    // Audit
    if let Ok(val) = std::env::var("QRBATCH_AUDIT_TARGET") {
        match val.to_lowercase().as_str() {
            "postgresql" => config.audit_target = AuditTarget::PostgreSQL,
            "jsonl" => config.audit_target = AuditTarget::Jsonl,
            other => tracing::warn!(value = %other, "Ignoring unknown QRBATCH_AUDIT_TARGET"),
        }
    }
    if let Some(ref mut pg) = config.postgresql {
        if let Ok(val) = std::env::var("QRBATCH_POSTGRESQL_CONNECTION_STRING") {
            pg.connection_string = secret_string(val);
        }
    }
    if let Ok(val) = std::env::var("QRBATCH_JSONL_PATH") {
        config.jsonl.path = val;
    }

    // Server and logging
    if let Ok(val) = std::env::var("QRBATCH_SERVER_BIND") {
        config.server.bind = val;
    }
    if let Ok(val) = std::env::var("QRBATCH_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("QRBATCH_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

/// Splits a comma separated field list, dropping empty entries
pub fn parse_field_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
