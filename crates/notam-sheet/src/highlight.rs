//! Flagged row highlighting

use crate::{SheetError, SheetLayout, SheetResult};
use std::path::Path;

/// Fill the first cell of each record row at `positions` and save in place.
///
/// Positions are record positions, not sheet rows; the layout supplies the
/// header offset. Nothing is written when `positions` is empty. Returns the
/// number of rows marked.
pub fn highlight_rows(path: &Path, positions: &[usize], layout: &SheetLayout) -> SheetResult<usize> {
    if positions.is_empty() {
        return Ok(0);
    }

    let mut book =
        umya_spreadsheet::reader::xlsx::read(path).map_err(|e| SheetError::Xlsx(e.to_string()))?;
    let sheet = book.get_sheet_mut(&0).ok_or(SheetError::MissingWorksheet)?;

    for &position in positions {
        let row = layout.sheet_row(position);
        sheet
            .get_style_mut((1, row))
            .set_background_color(layout.highlight_argb.as_str());
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| SheetError::Xlsx(e.to_string()))?;

    tracing::info!("Flagged rows highlighted in {}", path.display());
    Ok(positions.len())
}
