//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for qrbatch using clap.

pub mod commands;

use crate::domain::QrBatchError;
use clap::{Parser, Subcommand};

/// Exit code when the command completed (a batch with row errors still completed)
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration errors
pub const EXIT_CONFIGURATION: i32 = 2;
/// Exit code for a workbook that is unreadable or has the wrong headers
pub const EXIT_REJECTED: i32 = 3;
/// Exit code for every other failure
pub const EXIT_FATAL: i32 = 5;

/// qrbatch - encrypted QR codes from spreadsheet rows
#[derive(Parser, Debug)]
#[command(name = "qrbatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "qrbatch.toml", env = "QRBATCH_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "QRBATCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process one workbook and print the batch result
    Process(commands::process::ProcessArgs),

    /// Run the HTTP upload endpoint
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}

/// Maps an error that stopped a command to the process exit code
pub fn exit_code_for(err: &QrBatchError) -> i32 {
    match err {
        QrBatchError::Configuration(_) => EXIT_CONFIGURATION,
        QrBatchError::Schema(_) | QrBatchError::Workbook(_) => EXIT_REJECTED,
        _ => EXIT_FATAL,
    }
}
