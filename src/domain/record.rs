//! Actor record types
//!
//! This module provides the closed set of required spreadsheet columns, the
//! normalized header key used to match raw labels against them, and the typed
//! record read from one data row.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Returns true when a cell value counts as empty
///
/// A value is blank iff its trimmed length is zero. This is the only emptiness
/// predicate used by the pipeline.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Required spreadsheet column
///
/// The set is closed and order-independent: a workbook must carry exactly these
/// six columns, in any order, matched case- and accent-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredField {
    Codigo,
    Nombres,
    Telefono,
    Denominacion,
    Estado,
    Numpases,
}

impl RequiredField {
    /// All required fields in canonical order
    pub const ALL: [RequiredField; 6] = [
        RequiredField::Codigo,
        RequiredField::Nombres,
        RequiredField::Telefono,
        RequiredField::Denominacion,
        RequiredField::Estado,
        RequiredField::Numpases,
    ];

    /// Canonical (already normalized) column name
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::Codigo => "codigo",
            RequiredField::Nombres => "nombres",
            RequiredField::Telefono => "telefono",
            RequiredField::Denominacion => "denominacion",
            RequiredField::Estado => "estado",
            RequiredField::Numpases => "numpases",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequiredField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequiredField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("Unknown field: {s}"))
    }
}

/// Canonicalized header label
///
/// NFD-decomposed, combining marks stripped, trimmed and lowercased, so that
/// `" Teléfono "` and `"TELEFONO"` both become `"telefono"`.
///
/// # Examples
///
/// ```
/// use qrbatch::domain::record::NormalizedHeader;
///
/// let header = NormalizedHeader::new(" Denominación ");
/// assert_eq!(header.as_str(), "denominacion");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedHeader(String);

impl NormalizedHeader {
    /// Normalizes a raw header label
    pub fn new(raw: &str) -> Self {
        let stripped: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
        Self(stripped.trim().to_lowercase())
    }

    /// Returns the normalized label
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the raw label was blank
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Matches the label against the required set
    pub fn required_field(&self) -> Option<RequiredField> {
        RequiredField::from_str(&self.0).ok()
    }
}

impl fmt::Display for NormalizedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One valid data row
///
/// Every value is trimmed and non-blank once the row extractor hands it out.
/// Field declaration order is the canonical order, which also drives the key order
/// of the JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    pub codigo: String,
    pub nombres: String,
    pub telefono: String,
    pub denominacion: String,
    pub estado: String,
    pub numpases: String,
}

impl Record {
    /// Value of a required field
    pub fn get(&self, field: RequiredField) -> &str {
        match field {
            RequiredField::Codigo => &self.codigo,
            RequiredField::Nombres => &self.nombres,
            RequiredField::Telefono => &self.telefono,
            RequiredField::Denominacion => &self.denominacion,
            RequiredField::Estado => &self.estado,
            RequiredField::Numpases => &self.numpases,
        }
    }

    /// Mutable slot of a required field
    pub fn slot_mut(&mut self, field: RequiredField) -> &mut String {
        match field {
            RequiredField::Codigo => &mut self.codigo,
            RequiredField::Nombres => &mut self.nombres,
            RequiredField::Telefono => &mut self.telefono,
            RequiredField::Denominacion => &mut self.denominacion,
            RequiredField::Estado => &mut self.estado,
            RequiredField::Numpases => &mut self.numpases,
        }
    }

    /// Looks a field up by its name; unknown names yield `None`
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        RequiredField::from_str(name).ok().map(|field| self.get(field))
    }

    /// Phone number with every non-digit character removed
    pub fn phone_digits(&self) -> String {
        self.telefono.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Required fields whose value is blank, in canonical order
    pub fn blank_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| is_blank(self.get(*field)))
            .collect()
    }
}
