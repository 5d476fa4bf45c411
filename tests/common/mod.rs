//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use qrbatch::adapters::audit::{AuditEntry, AuditStore};
use qrbatch::adapters::dispatch::Dispatcher;
use qrbatch::adapters::storage::{ArtifactPublisher, ObjectMetadata, ObjectStorage};
use qrbatch::config::secret_string;
use qrbatch::core::pacing::Sleeper;
use qrbatch::core::pipeline::{BatchOrchestrator, Collaborators, PipelineSettings};
use qrbatch::domain::{DispatchError, Record, Result};
use rust_xlsxwriter::Workbook;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const HEADER: [&str; 6] = [
    "Código",
    "NOMBRES",
    " Teléfono ",
    "Denominación",
    "estado",
    "NumPases",
];

pub const PASSPHRASE: &str = "integration-passphrase-2024";

/// Builds an .xlsx workbook in memory, first row is the header
pub fn workbook(rows: &[Vec<&str>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            sheet.write_string(r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// The mixed batch used across tests: ok, skipped, invalid, dispatch failure
pub fn mixed_rows() -> Vec<Vec<&'static str>> {
    vec![
        HEADER.to_vec(),
        vec!["A1", "Juan Perez", "+51 987-654-321", "Comparsa Norte", "activo", "2"],
        vec!["", "", "", "", "", ""],
        vec!["A3", "Ana", "", "Comparsa Sur", "activo", "1"],
        vec!["FAIL", "Luis", "912345678", "Comparsa Este", "inactivo", "3"],
    ]
}

#[derive(Default)]
pub struct MemoryStorage {
    pub objects: Mutex<Vec<(String, usize, ObjectMetadata)>>,
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    fn bucket(&self) -> &str {
        "actors-qr.appspot.com"
    }

    async fn save(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<()> {
        self.objects
            .lock()
            .unwrap()
            .push((path.to_string(), bytes.len(), metadata.clone()));
        Ok(())
    }
}

/// Accepts every record except those whose codigo is `FAIL`
#[derive(Default)]
pub struct RecordingDispatcher {
    pub calls: Mutex<Vec<(String, String, Vec<u8>)>>,
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn dispatch(
        &self,
        record: &Record,
        artifact_url: &str,
        png: &[u8],
    ) -> std::result::Result<(), DispatchError> {
        self.calls.lock().unwrap().push((
            record.codigo.clone(),
            artifact_url.to_string(),
            png.to_vec(),
        ));
        if record.codigo == "FAIL" {
            return Err(DispatchError::Status {
                status: 500,
                body: r#"{"err":"x"}"#.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAudit {
    pub entries: Mutex<Vec<AuditEntry>>,
}

#[async_trait]
impl AuditStore for MemoryAudit {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Records requested delays without waiting
#[derive(Default)]
pub struct RecordingSleeper {
    pub delays: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

pub struct Fakes {
    pub storage: Arc<MemoryStorage>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub audit: Arc<MemoryAudit>,
}

impl Fakes {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(MemoryStorage::default()),
            dispatcher: Arc::new(RecordingDispatcher::default()),
            audit: Arc::new(MemoryAudit::default()),
        }
    }

    pub fn orchestrator(
        &self,
        settings: PipelineSettings,
        sleeper: Arc<dyn Sleeper>,
    ) -> BatchOrchestrator {
        let publisher = ArtifactPublisher::new(
            self.storage.clone(),
            "https://firebasestorage.googleapis.com/v0",
            "qr",
        )
        .unwrap();

        BatchOrchestrator::new(
            settings,
            Collaborators {
                publisher,
                dispatcher: self.dispatcher.clone(),
                audit: self.audit.clone(),
                sleeper,
            },
        )
        .unwrap()
    }
}

pub fn settings(min_delay_ms: u64, max_delay_ms: u64) -> PipelineSettings {
    PipelineSettings {
        passphrase: secret_string(PASSPHRASE.to_string()),
        template: None,
        fields: vec![],
        qr_width: 300,
        qr_margin: 1,
        min_delay_ms,
        max_delay_ms,
    }
}
