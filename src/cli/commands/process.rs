//! `process` command: run one local workbook through the pipeline

use crate::cli::{exit_code_for, EXIT_OK};
use crate::config::load_config;
use crate::core::pipeline::build_orchestrator;
use crate::domain::{BatchResult, Result};
use crate::log_error_with_context;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Excel workbook (.xlsx, .xls, .ods)
    pub file: PathBuf,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

impl ProcessArgs {
    /// Execute the process command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(file = %self.file.display(), "Starting process command");

        match self.run(config_path).await {
            Ok(batch) => {
                println!("{}", render_batch(&batch, self.pretty)?);
                Ok(EXIT_OK)
            }
            Err(e) => {
                log_error_with_context!(&e, "Batch aborted");
                eprintln!("Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }

    async fn run(&self, config_path: &str) -> Result<BatchResult> {
        let config = load_config(config_path)?;
        let orchestrator = build_orchestrator(&config).await?;
        let bytes = tokio::fs::read(&self.file).await?;
        orchestrator.process(&bytes).await
    }
}

/// Serializes the batch result for stdout
pub fn render_batch(batch: &BatchResult, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(batch)
    } else {
        serde_json::to_string(batch)
    }
}
