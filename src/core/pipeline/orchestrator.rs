//! Batch orchestration
//!
//! Drives the header check once, then every data row through the [`RowState`]
//! machine, strictly one row at a time. A row failure is recorded on that row and
//! never stops the batch; only workbook and header problems abort it.

use super::state::RowState;
use crate::adapters::audit::{AuditEntry, AuditStore};
use crate::adapters::dispatch::Dispatcher;
use crate::adapters::storage::ArtifactPublisher;
use crate::config::{QrBatchConfig, SecretString};
use crate::core::crypto::TokenCipher;
use crate::core::pacing::{Pacer, Sleeper};
use crate::core::payload::PayloadEncoder;
use crate::core::qr::QrEncoder;
use crate::core::sheet::{validate_headers, Extraction, RowExtractor, Sheet};
use crate::domain::{BatchResult, QrBatchError, Result, RowResult};
use crate::log_row_outcome;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Immutable pipeline settings
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub passphrase: SecretString,
    pub template: Option<String>,
    pub fields: Vec<String>,
    pub qr_width: u32,
    pub qr_margin: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl PipelineSettings {
    pub fn from_config(config: &QrBatchConfig) -> Self {
        Self {
            passphrase: config.qr.secret_key.clone(),
            template: config.qr.template.clone(),
            fields: config.qr.fields.clone(),
            qr_width: config.qr.width,
            qr_margin: config.qr.margin,
            min_delay_ms: config.pacing.min_delay_ms,
            max_delay_ms: config.pacing.max_delay_ms,
        }
    }
}

/// Side-effecting capabilities the pipeline needs
#[derive(Clone)]
pub struct Collaborators {
    pub publisher: ArtifactPublisher,
    pub dispatcher: Arc<dyn Dispatcher>,
    pub audit: Arc<dyn AuditStore>,
    pub sleeper: Arc<dyn Sleeper>,
}

/// Runs spreadsheet batches
pub struct BatchOrchestrator {
    encoder: PayloadEncoder,
    cipher: TokenCipher,
    qr: QrEncoder,
    publisher: ArtifactPublisher,
    dispatcher: Arc<dyn Dispatcher>,
    audit: Arc<dyn AuditStore>,
    pacer: Pacer,
}

impl std::fmt::Debug for BatchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOrchestrator")
            .field("payload_mode", &self.encoder.mode())
            .field("qr", &self.qr)
            .field("publisher", &self.publisher)
            .field("audit", &self.audit.name())
            .field("pacer", &self.pacer)
            .finish_non_exhaustive()
    }
}

impl BatchOrchestrator {
    /// Builds the orchestrator, validating settings up front
    ///
    /// # Errors
    ///
    /// [`QrBatchError::Configuration`] for a short passphrase or an unusable payload
    /// template.
    pub fn new(settings: PipelineSettings, collaborators: Collaborators) -> Result<Self> {
        let cipher = TokenCipher::new(&settings.passphrase)?;
        let encoder = PayloadEncoder::from_config(settings.template.as_deref(), &settings.fields)?;
        let pacer = Pacer::new(
            settings.min_delay_ms,
            settings.max_delay_ms,
            collaborators.sleeper,
        );

        tracing::debug!(
            payload_mode = encoder.mode(),
            min_delay_ms = settings.min_delay_ms,
            max_delay_ms = settings.max_delay_ms,
            "Batch orchestrator ready"
        );

        Ok(Self {
            encoder,
            cipher,
            qr: QrEncoder::new(settings.qr_width, settings.qr_margin),
            publisher: collaborators.publisher,
            dispatcher: collaborators.dispatcher,
            audit: collaborators.audit,
            pacer,
        })
    }

    /// Processes an uploaded workbook
    ///
    /// # Errors
    ///
    /// [`QrBatchError::Workbook`] or [`QrBatchError::Schema`]; in both cases no row
    /// has been touched. Row failures are reported inside the [`BatchResult`].
    pub async fn process(&self, bytes: &[u8]) -> Result<BatchResult> {
        let sheet = Sheet::from_bytes(bytes)?;
        self.process_sheet(&sheet).await
    }

    /// Processes an already decoded sheet
    pub async fn process_sheet(&self, sheet: &Sheet) -> Result<BatchResult> {
        let started = Instant::now();
        let index = validate_headers(sheet.header_row())?;
        let extractor = RowExtractor::new(sheet, index);

        tracing::info!(last_row = sheet.last_row(), "Starting batch");

        let mut batch = BatchResult::new();
        for row in extractor.rows() {
            let result = self
                .run_row(row, &extractor)
                .instrument(tracing::info_span!("row", row))
                .await;
            log_row_outcome!(&result);

            let paced = result.status.is_paced();
            batch.push(result);
            if paced {
                self.pacer.wait(row).await;
            }
        }

        batch.log_summary();
        tracing::info!(duration_ms = started.elapsed().as_millis() as u64, "Batch finished");
        Ok(batch)
    }

    async fn run_row(&self, row: usize, extractor: &RowExtractor<'_>) -> RowResult {
        let mut state = RowState::Start;
        while !state.is_terminal() {
            state = self.advance(row, extractor, state).await;
        }
        state.into_result(row)
    }

    /// Moves a row one stage forward
    async fn advance(&self, row: usize, extractor: &RowExtractor<'_>, state: RowState) -> RowState {
        let next = match state {
            RowState::Start => match extractor.extract(row) {
                Extraction::Skip => Ok(RowState::Skipped),
                Extraction::Invalid { message, .. } => Err(QrBatchError::RowValidation(message)),
                Extraction::Valid(record) => Ok(RowState::Extracted { record }),
            },
            RowState::Extracted { record } => self
                .encoder
                .encode(&record)
                .map(|plaintext| RowState::Encoded { record, plaintext }),
            RowState::Encoded { record, plaintext } => self
                .encrypt(plaintext)
                .await
                .map(|token| RowState::Encrypted { record, token }),
            RowState::Encrypted { record, token } => self
                .qr
                .render(&token)
                .map(|png| RowState::Rendered { record, token, png }),
            RowState::Rendered { record, token, png } => {
                let key = self.publisher.object_key(row);
                self.publisher
                    .publish(png.clone(), &key)
                    .await
                    .map(|qr_url| RowState::Published {
                        record,
                        token,
                        png,
                        qr_url,
                    })
            }
            RowState::Published {
                record,
                token,
                png,
                qr_url,
            } => self
                .dispatcher
                .dispatch(&record, &qr_url, &png)
                .await
                .map_err(QrBatchError::from)
                .map(|()| RowState::Dispatched {
                    record,
                    token,
                    qr_url,
                }),
            RowState::Dispatched {
                record,
                token,
                qr_url,
            } => self
                .audit
                .append(&AuditEntry::new(&record, &qr_url, &token))
                .await
                .map(|()| RowState::Audited { qr_url }),
            terminal => Ok(terminal),
        };

        next.unwrap_or_else(|err| {
            tracing::debug!(row, kind = err.kind(), "Row stage failed");
            RowState::Failed(err)
        })
    }

    /// Key derivation runs on the blocking pool
    async fn encrypt(&self, plaintext: String) -> Result<String> {
        let cipher = self.cipher.clone();
        tokio::task::spawn_blocking(move || cipher.encrypt(&plaintext))
            .await
            .map_err(|e| QrBatchError::Encryption(format!("Encryption task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{ObjectMetadata, ObjectStorage};
    use crate::config::secret_string;
    use crate::domain::{DispatchError, Record, RowStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, event: impl Into<String>) {
            self.events.lock().unwrap().push(event.into());
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    struct FakeStorage(Arc<Recorder>);

    #[async_trait]
    impl ObjectStorage for FakeStorage {
        fn bucket(&self) -> &str {
            "bucket"
        }

        async fn save(&self, path: &str, _: Vec<u8>, _: &str, _: &ObjectMetadata) -> Result<()> {
            self.0.push(format!("save {path}"));
            Ok(())
        }
    }

    struct FakeDispatcher {
        recorder: Arc<Recorder>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl Dispatcher for FakeDispatcher {
        async fn dispatch(
            &self,
            record: &Record,
            _: &str,
            png: &[u8],
        ) -> std::result::Result<(), DispatchError> {
            self.recorder.push(format!("dispatch {}", record.codigo));
            assert!(!png.is_empty());
            if self.fail_for.as_deref() == Some(record.codigo.as_str()) {
                return Err(DispatchError::Status {
                    status: 500,
                    body: r#"{"err":"x"}"#.to_string(),
                });
            }
            Ok(())
        }
    }

    struct FakeAudit(Arc<Recorder>);

    #[async_trait]
    impl AuditStore for FakeAudit {
        async fn append(&self, entry: &AuditEntry) -> Result<()> {
            assert!(entry.token.as_deref().unwrap_or_default().starts_with("v1."));
            self.0.push(format!(
                "audit {}",
                entry.codigo.as_deref().unwrap_or_default()
            ));
            Ok(())
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    struct FakeSleeper(Arc<Recorder>);

    #[async_trait]
    impl Sleeper for FakeSleeper {
        async fn sleep(&self, duration: Duration) {
            self.0.push(format!("sleep {}", duration.as_millis()));
        }
    }

    fn orchestrator(recorder: &Arc<Recorder>, fail_for: Option<&str>) -> BatchOrchestrator {
        let publisher = ArtifactPublisher::new(
            Arc::new(FakeStorage(recorder.clone())),
            "https://storage.example.com/v0",
            "qr",
        )
        .unwrap();

        BatchOrchestrator::new(
            PipelineSettings {
                passphrase: secret_string("a-long-enough-secret".to_string()),
                template: Some("{{codigo}}-{{nombres}}".to_string()),
                fields: vec![],
                qr_width: 200,
                qr_margin: 1,
                min_delay_ms: 3000,
                max_delay_ms: 3000,
            },
            Collaborators {
                publisher,
                dispatcher: Arc::new(FakeDispatcher {
                    recorder: recorder.clone(),
                    fail_for: fail_for.map(str::to_string),
                }),
                audit: Arc::new(FakeAudit(recorder.clone())),
                sleeper: Arc::new(FakeSleeper(recorder.clone())),
            },
        )
        .unwrap()
    }

    const HEADER: [&str; 6] = ["codigo", "nombres", "telefono", "denominacion", "estado", "numpases"];

    fn sheet(rows: Vec<[&str; 6]>) -> Sheet {
        let mut all = vec![HEADER];
        all.extend(rows);
        Sheet::from_rows(all)
    }

    #[tokio::test]
    async fn test_mixed_rows() {
        let recorder = Arc::new(Recorder::default());
        let batch = orchestrator(&recorder, None)
            .process_sheet(&sheet(vec![
                ["A1", "Juan", "987654321", "Grupo", "activo", "2"],
                ["", "", "", "", "", ""],
                ["A3", "Ana", "", "Grupo", "activo", "1"],
            ]))
            .await
            .unwrap();

        assert_eq!((batch.total, batch.ok, batch.skipped, batch.errors), (3, 1, 1, 1));
        assert_eq!(batch.results[0].status, RowStatus::Ok);
        assert!(batch.results[0]
            .qr_url
            .as_deref()
            .unwrap()
            .starts_with("https://storage.example.com/v0/b/bucket/o/qr%2Fqr_row_2_"));
        assert_eq!(batch.results[1], RowResult::skipped(3));
        assert_eq!(
            batch.results[2].error.as_deref(),
            Some("Row 4: blank fields -> telefono")
        );

        let events = recorder.events();
        assert_eq!(events.len(), 5, "{events:?}");
        assert!(events[0].starts_with("save qr/qr_row_2_"));
        assert_eq!(&events[1..], &["dispatch A1", "audit A1", "sleep 3000", "sleep 3000"]);
    }

    #[tokio::test]
    async fn test_dispatch_failure_isolated_and_not_audited() {
        let recorder = Arc::new(Recorder::default());
        let batch = orchestrator(&recorder, Some("A1"))
            .process_sheet(&sheet(vec![
                ["A1", "Juan", "987654321", "Grupo", "activo", "2"],
                ["A2", "Ana", "912345678", "Grupo", "activo", "1"],
            ]))
            .await
            .unwrap();

        assert_eq!((batch.ok, batch.errors), (1, 1));
        let message = batch.results[0].error.as_deref().unwrap();
        assert!(message.contains("500") && message.contains(r#"{"err":"x"}"#));

        let events = recorder.events();
        assert!(!events.contains(&"audit A1".to_string()));
        assert!(events.contains(&"audit A2".to_string()));
        assert_eq!(events.iter().filter(|e| e.starts_with("sleep")).count(), 2);
    }

    #[tokio::test]
    async fn test_schema_error_touches_nothing() {
        let recorder = Arc::new(Recorder::default());
        let sheet = Sheet::from_rows(vec![
            vec!["codigo", "nombres", "telefono", "denominacion", "estado", "numpases", "email"],
            vec!["A1", "Juan", "987654321", "Grupo", "activo", "2", "x@y.z"],
        ]);

        let err = orchestrator(&recorder, None)
            .process_sheet(&sheet)
            .await
            .unwrap_err();

        assert!(matches!(err, QrBatchError::Schema(_)));
        assert!(recorder.events().is_empty());
    }

    #[tokio::test]
    async fn test_skipped_rows_have_no_side_effects() {
        let recorder = Arc::new(Recorder::default());
        let batch = orchestrator(&recorder, None)
            .process_sheet(&sheet(vec![
                ["", "", "", "", "", ""],
                [" ", "", "  ", "", "", ""],
            ]))
            .await
            .unwrap();

        assert_eq!((batch.total, batch.skipped), (2, 2));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_short_passphrase_fails_construction() {
        let recorder = Arc::new(Recorder::default());
        let publisher = ArtifactPublisher::new(
            Arc::new(FakeStorage(recorder.clone())),
            "https://storage.example.com/v0",
            "qr",
        )
        .unwrap();

        let err = BatchOrchestrator::new(
            PipelineSettings {
                passphrase: secret_string("short".to_string()),
                template: None,
                fields: vec![],
                qr_width: 600,
                qr_margin: 1,
                min_delay_ms: 0,
                max_delay_ms: 0,
            },
            Collaborators {
                publisher,
                dispatcher: Arc::new(FakeDispatcher {
                    recorder: recorder.clone(),
                    fail_for: None,
                }),
                audit: Arc::new(FakeAudit(recorder.clone())),
                sleeper: Arc::new(FakeSleeper(recorder)),
            },
        )
        .unwrap_err();

        assert!(matches!(err, QrBatchError::Configuration(_)));
    }
}
