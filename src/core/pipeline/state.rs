//! Per-row state machine
//!
//! A row moves forward one stage at a time:
//!
//! ```text
//! Start ─┬─> Skipped
//!        └─> Extracted -> Encoded -> Encrypted -> Rendered -> Published -> Dispatched -> Audited
//!
//! any non-terminal state ──error──> Failed
//! ```
//!
//! `Skipped`, `Audited` and `Failed` are terminal. Each state carries exactly the
//! data the next stage needs; the token and image are dropped once consumed.

use crate::domain::{QrBatchError, Record, RowResult};

#[derive(Debug)]
pub enum RowState {
    Start,
    Skipped,
    Extracted {
        record: Record,
    },
    Encoded {
        record: Record,
        plaintext: String,
    },
    Encrypted {
        record: Record,
        token: String,
    },
    Rendered {
        record: Record,
        token: String,
        png: Vec<u8>,
    },
    Published {
        record: Record,
        token: String,
        png: Vec<u8>,
        qr_url: String,
    },
    Dispatched {
        record: Record,
        token: String,
        qr_url: String,
    },
    Audited {
        qr_url: String,
    },
    Failed(QrBatchError),
}

impl RowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RowState::Skipped | RowState::Audited { .. } | RowState::Failed(_)
        )
    }

    /// Stage name, used in logs
    pub fn stage(&self) -> &'static str {
        match self {
            RowState::Start => "start",
            RowState::Skipped => "skipped",
            RowState::Extracted { .. } => "extracted",
            RowState::Encoded { .. } => "encoded",
            RowState::Encrypted { .. } => "encrypted",
            RowState::Rendered { .. } => "rendered",
            RowState::Published { .. } => "published",
            RowState::Dispatched { .. } => "dispatched",
            RowState::Audited { .. } => "audited",
            RowState::Failed(_) => "failed",
        }
    }

    /// Converts a terminal state into the row's result
    ///
    /// A non-terminal state means the row was abandoned mid-way and is reported as
    /// an error naming the last stage reached.
    pub fn into_result(self, row: usize) -> RowResult {
        match self {
            RowState::Skipped => RowResult::skipped(row),
            RowState::Audited { qr_url } => RowResult::ok(row, qr_url),
            RowState::Failed(err) => RowResult::error(row, err.to_string()),
            other => RowResult::error(
                row,
                format!("Row {row}: processing stopped after stage '{}'", other.stage()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DispatchError, RowStatus};

    #[test]
    fn test_terminal_states() {
        assert!(RowState::Skipped.is_terminal());
        assert!(RowState::Audited {
            qr_url: "u".into()
        }
        .is_terminal());
        assert!(RowState::Failed(QrBatchError::Publish("x".into())).is_terminal());
        assert!(!RowState::Start.is_terminal());
        assert!(!RowState::Extracted {
            record: Record::default()
        }
        .is_terminal());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(RowState::Skipped.into_result(3), RowResult::skipped(3));
        assert_eq!(
            RowState::Audited {
                qr_url: "https://x".into()
            }
            .into_result(2),
            RowResult::ok(2, "https://x")
        );

        let failed = RowState::Failed(
            DispatchError::Status {
                status: 500,
                body: r#"{"err":"x"}"#.into(),
            }
            .into(),
        )
        .into_result(4);
        assert_eq!(failed.status, RowStatus::Error);
        assert_eq!(failed.error.as_deref(), Some(r#"API responded 500: {"err":"x"}"#));
    }

    #[test]
    fn test_abandoned_row_is_error() {
        let result = RowState::Encoded {
            record: Record::default(),
            plaintext: "p".into(),
        }
        .into_result(5);
        assert_eq!(result.status, RowStatus::Error);
        assert!(result.error.unwrap().contains("encoded"));
    }
}
