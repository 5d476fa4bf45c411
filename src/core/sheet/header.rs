//! Header row validation
//!
//! The header row must carry exactly the required column set, in any order. Labels
//! are compared after normalization, so `"Teléfono"` matches `telefono`. Blank header
//! cells are ignored.

use crate::domain::{NormalizedHeader, QrBatchError, RequiredField, Result};

/// Column position of every required field
///
/// Only [`validate_headers`] builds one, so every field is guaranteed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderIndex {
    columns: [usize; RequiredField::ALL.len()],
}

impl HeaderIndex {
    /// 0-based column holding `field`
    pub fn column(&self, field: RequiredField) -> usize {
        self.columns[field as usize]
    }
}

/// Validates the raw header row and builds the [`HeaderIndex`]
///
/// When a normalized label appears twice, the right-most column wins.
///
/// # Errors
///
/// [`QrBatchError::Schema`] listing the missing columns, the unexpected ones and the
/// raw header row.
pub fn validate_headers(raw_headers: &[String]) -> Result<HeaderIndex> {
    let mut columns: [Option<usize>; RequiredField::ALL.len()] = [None; RequiredField::ALL.len()];
    let mut extras: Vec<String> = Vec::new();

    for (position, raw) in raw_headers.iter().enumerate() {
        let header = NormalizedHeader::new(raw);
        if header.is_empty() {
            continue;
        }
        match header.required_field() {
            Some(field) => columns[field as usize] = Some(position),
            None => extras.push(header.as_str().to_string()),
        }
    }

    let missing: Vec<&str> = RequiredField::ALL
        .iter()
        .filter(|field| columns[**field as usize].is_none())
        .map(RequiredField::as_str)
        .collect();

    if !missing.is_empty() || !extras.is_empty() {
        let mut parts = Vec::with_capacity(3);
        if !missing.is_empty() {
            parts.push(format!("Missing columns: {}", missing.join(", ")));
        }
        if !extras.is_empty() {
            parts.push(format!("Unexpected columns: {}", extras.join(", ")));
        }
        parts.push(format!("Headers read: [{}]", raw_headers.join(" | ")));

        tracing::warn!(
            missing = missing.len(),
            unexpected = extras.len(),
            "Header row rejected"
        );
        return Err(QrBatchError::Schema(parts.join(" | ")));
    }

    let mut resolved = [0usize; RequiredField::ALL.len()];
    for field in RequiredField::ALL {
        if let Some(column) = columns[field as usize] {
            resolved[field as usize] = column;
        }
    }

    Ok(HeaderIndex { columns: resolved })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_order() {
        let index = validate_headers(&headers(&[
            "codigo",
            "nombres",
            "telefono",
            "denominacion",
            "estado",
            "numpases",
        ]))
        .unwrap();
        assert_eq!(index.column(RequiredField::Codigo), 0);
        assert_eq!(index.column(RequiredField::Numpases), 5);
    }

    #[test]
    fn test_accents_case_and_blank_headers() {
        let index = validate_headers(&headers(&[
            " NumPases ",
            "",
            "Código",
            "NOMBRES",
            "Teléfono",
            "Denominación",
            "Estado",
        ]))
        .unwrap();
        assert_eq!(index.column(RequiredField::Numpases), 0);
        assert_eq!(index.column(RequiredField::Codigo), 2);
        assert_eq!(index.column(RequiredField::Estado), 6);
    }

    #[test]
    fn test_duplicate_header_right_most_wins() {
        let index = validate_headers(&headers(&[
            "codigo",
            "nombres",
            "telefono",
            "denominacion",
            "estado",
            "numpases",
            "Codigo",
        ]))
        .unwrap();
        assert_eq!(index.column(RequiredField::Codigo), 6);
    }

    #[test_case(&["codigo", "nombres", "telefono", "denominacion", "estado"], "Missing columns: numpases" ; "missing one")]
    #[test_case(&["codigo", "nombres", "telefono", "denominacion", "estado", "numpases", "email"], "Unexpected columns: email" ; "extra one")]
    #[test_case(&[], "Missing columns: codigo, nombres, telefono, denominacion, estado, numpases" ; "empty row")]
    fn test_rejected_header_rows(labels: &[&str], expected: &str) {
        let err = validate_headers(&headers(labels)).unwrap_err();
        assert!(matches!(err, QrBatchError::Schema(_)));
        let message = err.to_string();
        assert!(message.starts_with("Invalid headers."), "{message}");
        assert!(message.contains(expected), "{message}");
        assert!(message.contains("Headers read: ["), "{message}");
    }

    #[test]
    fn test_message_lists_both_lists() {
        let err = validate_headers(&headers(&[
            "codigo", "nombres", "celular", "denominacion", "estado", "numpases",
        ]))
        .unwrap_err()
        .to_string();
        assert!(err.contains("Missing columns: telefono"));
        assert!(err.contains("Unexpected columns: celular"));
        assert!(err.contains("codigo | nombres | celular"));
    }
}
