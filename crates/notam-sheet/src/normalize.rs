//! Legacy `.xls` to `.xlsx` conversion

use crate::reader::{cell_text, first_sheet_range};
use crate::{SheetError, SheetResult, WorkbookFormat};
use calamine::Data;
use std::path::{Path, PathBuf};

/// Number formats for converted date and duration cells
const DATETIME_FORMAT: &str = "mm/dd/yyyy hh:mm";
const DURATION_FORMAT: &str = "[h]:mm:ss";

/// Return a path to an `.xlsx` workbook with the same content as `path`.
///
/// `.xlsx` input is returned unchanged. `.xls` input is copied cell by cell
/// into a sibling `.xlsx`, keeping every value at its original row and
/// column so row offsets stay valid. Other extensions are rejected.
pub fn normalize(path: &Path) -> SheetResult<PathBuf> {
    match WorkbookFormat::from_path(path)? {
        WorkbookFormat::Xlsx => Ok(path.to_path_buf()),
        WorkbookFormat::Xls => {
            let target = path.with_extension(WorkbookFormat::Xlsx.extension());
            tracing::info!("Converting {} to .xlsx format...", path.display());
            convert(path, &target)?;
            tracing::info!("File converted to {}", target.display());
            Ok(target)
        }
    }
}

/// Copy the first worksheet of any readable workbook into a new `.xlsx`
pub fn convert(source: &Path, target: &Path) -> SheetResult<()> {
    let range = first_sheet_range(source)?;
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));

    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).ok_or(SheetError::MissingWorksheet)?;

    for (row, col, value) in range.used_cells() {
        // umya coordinates are (column, row), both 1-based
        let coordinate = (col_offset + col as u32 + 1, row_offset + row as u32 + 1);
        let cell = sheet.get_cell_mut(coordinate);
        match value {
            Data::Int(i) => {
                cell.set_value_number(*i as f64);
            }
            Data::Float(f) => {
                cell.set_value_number(*f);
            }
            Data::Bool(b) => {
                cell.set_value_bool(*b);
            }
            Data::DateTime(dt) => {
                // Serial value plus a date format, as Excel stores dates
                cell.set_value_number(dt.as_f64());
                let format = if dt.is_duration() {
                    DURATION_FORMAT
                } else {
                    DATETIME_FORMAT
                };
                sheet
                    .get_style_mut(coordinate)
                    .get_number_format_mut()
                    .set_format_code(format);
            }
            other => {
                cell.set_value(cell_text(Some(other)));
            }
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, target)
        .map_err(|e| SheetError::Xlsx(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write_export;
    use crate::{read_records, SheetLayout};

    #[test]
    fn test_xlsx_is_unchanged() {
        let path = Path::new("reports/NOTAMsExcel.xlsx");
        assert_eq!(normalize(path).unwrap(), path);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            normalize(Path::new("NOTAMs.csv")),
            Err(SheetError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_convert_preserves_coordinates() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source.xlsx");
        let target = tmp.path().join("copy.xlsx");
        write_export(&source, &[("ABQ", "WIND U/S"), ("SAF", "CEILING UNREL")]);

        convert(&source, &target).unwrap();

        let layout = SheetLayout::default();
        let original = read_records(&source, &layout).unwrap();
        let copied = read_records(&target, &layout).unwrap();
        assert_eq!(original, copied);
    }

    #[test]
    fn test_convert_keeps_dates_as_dates() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("dated.xlsx");
        let target = tmp.path().join("dated-copy.xlsx");

        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((1, 6)).set_value("ABQ");
        sheet.get_cell_mut((5, 6)).set_value_number(45565.5);
        sheet
            .get_style_mut((5, 6))
            .get_number_format_mut()
            .set_format_code("mm/dd/yyyy hh:mm");
        umya_spreadsheet::writer::xlsx::write(&book, &source).unwrap();

        convert(&source, &target).unwrap();

        let range = first_sheet_range(&target).unwrap();
        match range.get_value((5, 4)) {
            Some(Data::DateTime(dt)) => {
                assert!((dt.as_f64() - 45565.5).abs() < 1e-9);
                assert!(!dt.is_duration());
            }
            other => panic!("expected a date cell, got {:?}", other),
        }
        assert_eq!(
            range.get_value((5, 0)),
            Some(&Data::String("ABQ".to_string()))
        );
    }
}
