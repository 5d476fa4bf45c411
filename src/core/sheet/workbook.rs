//! Workbook decoding
//!
//! Only the first worksheet is read. Cells are flattened to their display text,
//! trimmed, and addressed by absolute position so that leading blank rows or columns
//! in the file do not shift row numbers.

use crate::domain::{QrBatchError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;

/// Text view of the first worksheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    /// `rows[0]` is sheet row 1 (the header row)
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Decodes a workbook and keeps its first worksheet
    ///
    /// Accepts any format calamine sniffs (xlsx, xlsm, xlsb, xls, ods).
    ///
    /// # Errors
    ///
    /// [`QrBatchError::Workbook`] when the bytes are not a workbook or it has no sheets.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| QrBatchError::Workbook(format!("Failed to read workbook: {e}")))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| QrBatchError::Workbook("The workbook has no worksheets".to_string()))?
            .map_err(|e| QrBatchError::Workbook(format!("Failed to read first worksheet: {e}")))?;

        Ok(Self::from_range(&range))
    }

    fn from_range(range: &Range<Data>) -> Self {
        let Some((last_row, last_col)) = range.end() else {
            return Self::default();
        };

        let rows = (0..=last_row)
            .map(|r| {
                (0..=last_col)
                    .map(|c| {
                        range
                            .get_value((r, c))
                            .map(|cell| cell.to_string().trim().to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self { rows }
    }

    /// Builds a sheet from literal rows, first row being the header
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|v| v.into().trim().to_string()).collect())
                .collect(),
        }
    }

    /// Raw header labels from row 1
    pub fn header_row(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of the last used row (1-based); 0 for an empty sheet
    pub fn last_row(&self) -> usize {
        self.rows.len()
    }

    /// Trimmed text at a 1-based row and 0-based column; empty when out of range
    pub fn cell_text(&self, row: usize, col: usize) -> &str {
        row.checked_sub(1)
            .and_then(|r| self.rows.get(r))
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or_default()
    }
}
