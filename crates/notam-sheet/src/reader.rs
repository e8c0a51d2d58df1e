//! NOTAM record extraction

use crate::{SheetError, SheetLayout, SheetResult};
use calamine::{open_workbook_auto, Data, Range, Reader};
use notam_core::NotamRecord;
use std::path::Path;

/// Cell range of the first worksheet
pub(crate) fn first_sheet_range(path: &Path) -> SheetResult<Range<Data>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::MissingWorksheet)??;
    Ok(range)
}

/// Render a cell as trimmed text; empty cells become `""`
pub(crate) fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Read one record per sheet row from `layout.first_record_row` on.
///
/// Blank rows inside the table still produce a record so that positions
/// map 1:1 onto sheet rows; trailing blank rows are dropped.
pub fn read_records(path: &Path, layout: &SheetLayout) -> SheetResult<Vec<NotamRecord>> {
    let range = first_sheet_range(path)?;
    let records = records_from_range(&range, layout);
    tracing::info!("Read {} NOTAM records from {}", records.len(), path.display());
    Ok(records)
}

fn records_from_range(range: &Range<Data>, layout: &SheetLayout) -> Vec<NotamRecord> {
    let Some((end_row, _)) = range.end() else {
        return Vec::new();
    };
    let first_row = layout.first_record_row.saturating_sub(1);
    let cell = |row: u32, col: u32| cell_text(range.get_value((row, col)));

    let mut records: Vec<NotamRecord> = (first_row..=end_row)
        .map(|row| {
            NotamRecord::new(
                (row - first_row) as usize,
                cell(row, layout.airport_column),
                cell(row, layout.text_column),
            )
            .with_validity(
                cell(row, layout.effective_column),
                cell(row, layout.expiration_column),
            )
        })
        .collect();

    while records
        .last()
        .is_some_and(|r| r.airport_id.is_empty() && r.is_blank())
    {
        records.pop();
    }

    records
}
