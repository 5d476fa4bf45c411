//! `serve` command: run the upload endpoint

use crate::cli::{exit_code_for, EXIT_OK};
use crate::config::load_config;
use crate::core::pipeline::build_orchestrator;
use crate::domain::Result;
use crate::log_error_with_context;
use crate::server;
use clap::Args;
use std::sync::Arc;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override `server.bind`
    #[arg(long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(EXIT_OK),
            Err(e) => {
                log_error_with_context!(&e, "Server stopped");
                eprintln!("Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }

    async fn run(&self, config_path: &str) -> Result<()> {
        let mut config = load_config(config_path)?;
        if let Some(bind) = &self.bind {
            tracing::info!(bind = %bind, "Overriding server.bind from CLI");
            config.server.bind = bind.clone();
        }

        let orchestrator = build_orchestrator(&config).await?;
        server::serve(&config.server, Arc::new(orchestrator)).await
    }
}
