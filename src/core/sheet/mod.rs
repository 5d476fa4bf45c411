//! Spreadsheet input: workbook decoding, header validation and row extraction

pub mod extract;
pub mod header;
pub mod workbook;

pub use extract::{Extraction, RowExtractor};
pub use header::{validate_headers, HeaderIndex};
pub use workbook::Sheet;
