//! NOTAM export spreadsheets
//!
//! This crate reads NOTAM records out of the FAA export workbook, converts
//! legacy `.xls` exports to `.xlsx`, and highlights flagged rows in place.

pub mod highlight;
pub mod normalize;
pub mod reader;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use highlight::highlight_rows;
pub use normalize::normalize;
pub use reader::read_records;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("XLSX error: {0}")]
    Xlsx(String),

    #[error("Workbook has no worksheet")]
    MissingWorksheet,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

pub type SheetResult<T> = Result<T, SheetError>;

/// Workbook container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Legacy BIFF workbook
    Xls,
    /// Office Open XML workbook
    Xlsx,
}

impl WorkbookFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> SheetResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xls" => Ok(WorkbookFormat::Xls),
            "xlsx" => Ok(WorkbookFormat::Xlsx),
            _ => Err(SheetError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            WorkbookFormat::Xls => "xls",
            WorkbookFormat::Xlsx => "xlsx",
        }
    }
}

/// Where things live in the export sheet.
///
/// Columns are 0-based and positional; rows are 1-based sheet rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Sheet row of the first record (after metadata and header rows)
    pub first_record_row: u32,
    pub airport_column: u32,
    pub effective_column: u32,
    pub expiration_column: u32,
    pub text_column: u32,
    /// ARGB fill applied to the first cell of flagged rows
    pub highlight_argb: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            // Four metadata rows, then the column header row
            first_record_row: 6,
            airport_column: 0,
            effective_column: 4,
            expiration_column: 5,
            text_column: 6,
            highlight_argb: "FFFF0000".to_string(),
        }
    }
}

impl SheetLayout {
    /// 1-based sheet row holding the record at `position`
    pub fn sheet_row(&self, position: usize) -> u32 {
        self.first_record_row + position as u32
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::Path;

    /// Write a small export-shaped workbook: four metadata rows, a header
    /// row, then one row per `(airport, advisory)` pair.
    pub fn write_export(path: &Path, rows: &[(&str, &str)]) {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();

        sheet.get_cell_mut((1, 1)).set_value("NOTAM Search Results");
        sheet.get_cell_mut((1, 2)).set_value("Generated 10/15/2024");
        sheet.get_cell_mut((1, 5)).set_value("Location");
        sheet.get_cell_mut((5, 5)).set_value("Effective Date");
        sheet.get_cell_mut((6, 5)).set_value("Expiration Date");
        sheet.get_cell_mut((7, 5)).set_value("NOTAM Condition");

        for (i, (airport, text)) in rows.iter().enumerate() {
            let row = 6 + i as u32;
            sheet.get_cell_mut((1, row)).set_value(*airport);
            sheet.get_cell_mut((2, row)).set_value("NM");
            sheet.get_cell_mut((5, row)).set_value("10/01/2024 1200");
            sheet.get_cell_mut((6, row)).set_value("10/31/2024 2359");
            sheet.get_cell_mut((7, row)).set_value(*text);
        }

        umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
    }
}
