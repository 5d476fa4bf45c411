//! Row extraction and classification

use super::header::HeaderIndex;
use super::workbook::Sheet;
use crate::domain::{Record, RequiredField};

/// Classification of one data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Every required field is blank
    Skip,
    /// Every required field has a value
    Valid(Record),
    /// Some, but not all, fields are blank
    Invalid {
        blank: Vec<RequiredField>,
        message: String,
    },
}

/// Reads data rows through a [`HeaderIndex`]
#[derive(Debug, Clone, Copy)]
pub struct RowExtractor<'a> {
    sheet: &'a Sheet,
    index: HeaderIndex,
}

impl<'a> RowExtractor<'a> {
    pub fn new(sheet: &'a Sheet, index: HeaderIndex) -> Self {
        Self { sheet, index }
    }

    /// Data rows in iteration order: 2 through the last used row
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        2..=self.sheet.last_row()
    }

    /// Reads and classifies sheet row `row` (1-based)
    pub fn extract(&self, row: usize) -> Extraction {
        let mut record = Record::default();
        for field in RequiredField::ALL {
            *record.slot_mut(field) = self.sheet.cell_text(row, self.index.column(field)).to_string();
        }

        let blank = record.blank_fields();
        if blank.len() == RequiredField::ALL.len() {
            return Extraction::Skip;
        }
        if !blank.is_empty() {
            let names: Vec<&str> = blank.iter().map(RequiredField::as_str).collect();
            let message = format!("Row {row}: blank fields -> {}", names.join(", "));
            return Extraction::Invalid { blank, message };
        }
        Extraction::Valid(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sheet::header::validate_headers;

    fn sheet() -> Sheet {
        Sheet::from_rows(vec![
            vec!["numpases", "codigo", "nombres", "telefono", "denominacion", "estado"],
            vec!["2", "A1", "Juan", "987 654 321", "Grupo", "activo"],
            vec!["", " ", "", "", "", ""],
            vec!["1", "A3", "Ana", "", "Grupo", ""],
        ])
    }

    fn extractor(sheet: &Sheet) -> RowExtractor<'_> {
        let index = validate_headers(sheet.header_row()).unwrap();
        RowExtractor::new(sheet, index)
    }

    #[test]
    fn test_rows_range() {
        let sheet = sheet();
        assert_eq!(extractor(&sheet).rows(), 2..=4);
    }

    #[test]
    fn test_valid_row_reads_by_name() {
        let sheet = sheet();
        match extractor(&sheet).extract(2) {
            Extraction::Valid(record) => {
                assert_eq!(record.codigo, "A1");
                assert_eq!(record.numpases, "2");
                assert_eq!(record.telefono, "987 654 321");
            }
            other => panic!("expected valid row, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_row_is_skipped() {
        let sheet = sheet();
        assert_eq!(extractor(&sheet).extract(3), Extraction::Skip);
    }

    #[test]
    fn test_partial_row_lists_exactly_blank_fields() {
        let sheet = sheet();
        match extractor(&sheet).extract(4) {
            Extraction::Invalid { blank, message } => {
                assert_eq!(blank, vec![RequiredField::Telefono, RequiredField::Estado]);
                assert_eq!(message, "Row 4: blank fields -> telefono, estado");
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_sheet_has_no_rows() {
        let sheet = Sheet::from_rows(vec![vec![
            "codigo",
            "nombres",
            "telefono",
            "denominacion",
            "estado",
            "numpases",
        ]]);
        assert_eq!(extractor(&sheet).rows().count(), 0);
    }
}
