//! Per-row and per-batch results
//!
//! These are the values returned to the caller of a batch run and serialized as the
//! upload endpoint's JSON response.

use serde::{Deserialize, Serialize};

/// Terminal state of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Ok,
    Error,
    Skipped,
}

impl RowStatus {
    /// Rows that reached `ok` or `error` are followed by a pacing delay
    pub fn is_paced(&self) -> bool {
        matches!(self, RowStatus::Ok | RowStatus::Error)
    }
}

/// Outcome of one spreadsheet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowResult {
    /// 1-based sheet row (row 1 is the header, so data starts at 2)
    pub row: usize,
    pub status: RowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RowResult {
    /// Row processed end to end
    pub fn ok(row: usize, qr_url: impl Into<String>) -> Self {
        Self {
            row,
            status: RowStatus::Ok,
            qr_url: Some(qr_url.into()),
            error: None,
        }
    }

    /// Row failed at some stage
    pub fn error(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            status: RowStatus::Error,
            qr_url: None,
            error: Some(message.into()),
        }
    }

    /// Row was fully blank
    pub fn skipped(row: usize) -> Self {
        Self {
            row,
            status: RowStatus::Skipped,
            qr_url: None,
            error: None,
        }
    }
}

/// Summary of a whole batch run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchResult {
    /// Number of data rows visited
    pub total: usize,
    pub ok: usize,
    pub skipped: usize,
    pub errors: usize,
    /// One entry per visited row, ordered by row number
    pub results: Vec<RowResult>,
}

impl BatchResult {
    /// Create a new empty batch result
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row outcome and update the counters
    ///
    /// Rows must be pushed in increasing row order.
    pub fn push(&mut self, result: RowResult) {
        debug_assert!(
            self.results.last().map_or(true, |last| last.row < result.row),
            "row results must be strictly increasing"
        );
        match result.status {
            RowStatus::Ok => self.ok += 1,
            RowStatus::Error => self.errors += 1,
            RowStatus::Skipped => self.skipped += 1,
        }
        self.total += 1;
        self.results.push(result);
    }

    /// True when no row ended in error
    pub fn is_successful(&self) -> bool {
        self.errors == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total,
            ok = self.ok,
            skipped = self.skipped,
            errors = self.errors,
            "Batch completed"
        );

        if self.errors > 0 {
            for failed in self.results.iter().filter(|r| r.status == RowStatus::Error) {
                tracing::warn!(
                    row = failed.row,
                    error = failed.error.as_deref().unwrap_or_default(),
                    "Row failed"
                );
            }
        }
    }
}
