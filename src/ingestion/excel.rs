use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::error::{RegistryError, RegistryResult};
use crate::types::{DataSet, HeaderMapping};

use super::headers::{dedupe_headers, unnamed};

/// Physical row holding the column labels.
const HEADER_ROW: u32 = 0;
/// Physical row discarded after the header (the registry's second header line).
const SKIPPED_ROW: u32 = 1;

/// Read the first worksheet of a spreadsheet (`.xlsx`, `.xls`, `.ods`, etc.) into a `DataSet`.
///
/// Behavior:
/// - Row 0 is the header; row 1 is discarded; data starts at row 2
/// - Blank header cells are named by `mapping` when it covers their position, otherwise
///   `Unnamed: {position}`
/// - Every cell is converted to its canonical text form (see [`canonical_text`])
/// - Data rows where every cell is empty are skipped
pub fn load_excel_from_path(path: impl AsRef<Path>, mapping: &HeaderMapping) -> RegistryResult<DataSet> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| RegistryError::load(path, e))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| RegistryError::malformed(path, "workbook has no sheets"))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| RegistryError::load(path, e))?;

    load_sheet_range(&range, mapping)
        .map_err(|message| RegistryError::malformed(path, format!("sheet '{sheet}': {message}")))
}

/// Convert a worksheet range using absolute (A1-based) row/column positions.
pub fn load_sheet_range(range: &Range<Data>, mapping: &HeaderMapping) -> Result<DataSet, String> {
    let (last_row, last_col) = range
        .end()
        .ok_or_else(|| "sheet is empty (no header row found)".to_string())?;
    let width = last_col as usize + 1;

    let cell = |row: u32, col: u32| range.get_value((row, col)).unwrap_or(&Data::Empty);

    let headers: Vec<String> = (0..=last_col)
        .map(|col| {
            let label = canonical_text(cell(HEADER_ROW, col));
            if label.trim().is_empty() {
                let position = col as usize;
                mapping
                    .name_for(position)
                    .map(str::to_owned)
                    .unwrap_or_else(|| unnamed(position))
            } else {
                label
            }
        })
        .collect();
    let columns = dedupe_headers(headers);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in (SKIPPED_ROW + 1)..=last_row.max(SKIPPED_ROW) {
        let cells: Vec<&Data> = (0..=last_col).map(|col| cell(row, col)).collect();
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let mut out_row: Vec<String> = cells.into_iter().map(canonical_text).collect();
        out_row.resize(width, String::new());
        rows.push(out_row);
    }

    Ok(DataSet::new(columns, rows))
}

/// Canonical text form of a spreadsheet cell.
///
/// Integral floats drop their fractional part (`5.0` becomes `"5"`), so a points column typed as
/// numbers in one export and as text in another yields the same values. Empty cells become `""`.
pub fn canonical_text(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(d) => d.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}
