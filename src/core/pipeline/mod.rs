//! Row pipeline: state machine and batch orchestrator

pub mod orchestrator;
pub mod state;

pub use orchestrator::{BatchOrchestrator, Collaborators, PipelineSettings};
pub use state::RowState;

use crate::adapters::audit::create_audit_store;
use crate::adapters::dispatch::HttpDispatcher;
use crate::adapters::storage::{ArtifactPublisher, FirebaseStorage};
use crate::config::QrBatchConfig;
use crate::core::pacing::TokioSleeper;
use crate::domain::Result;
use std::sync::Arc;

/// Wires the production collaborators from configuration
///
/// # Errors
///
/// Returns an error if any collaborator cannot be created or the settings are
/// invalid.
pub async fn build_orchestrator(config: &QrBatchConfig) -> Result<BatchOrchestrator> {
    let dispatcher = HttpDispatcher::new(&config.api)?;
    let storage = FirebaseStorage::new(&config.storage)?;
    let publisher = ArtifactPublisher::from_config(Arc::new(storage), &config.storage)?;
    let audit = create_audit_store(config).await?;

    tracing::info!(
        api = dispatcher.target_url(),
        bucket = %config.storage.bucket,
        audit = audit.name(),
        "Pipeline collaborators ready"
    );

    BatchOrchestrator::new(
        PipelineSettings::from_config(config),
        Collaborators {
            publisher,
            dispatcher: Arc::new(dispatcher),
            audit,
            sleeper: Arc::new(TokioSleeper),
        },
    )
}
