//! Multi-sheet Excel report.
//!
//! The workbook holds a sheet `"All"` with the complete filtered dataset and one sheet per
//! selected category with the rows marked in that category. Each sheet is a single Excel table
//! (style Medium 2) with one header per column.

use std::path::Path;

use rust_xlsxwriter::{ColNum, RowNum, Table, TableColumn, TableStyle, Workbook, Worksheet, XlsxError};

use crate::error::{RegistryError, RegistryResult};
use crate::observability::{PipelineObserver, Severity, StageContext};
use crate::processing::rows_marked_in;
use crate::types::DataSet;

use super::atomic::write_atomically;

/// Name of the sheet holding the whole filtered dataset.
pub const ALL_SHEET: &str = "All";

/// Excel's limit on sheet name length, in characters.
pub const MAX_SHEET_NAME_CHARS: usize = 31;

const MIN_COLUMN_WIDTH: usize = 12;
const INVALID_SHEET_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// One sheet written to the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    /// Sheet name as it appears in the workbook.
    pub name: String,
    /// Category the sheet was built for; `None` for `"All"`.
    pub category: Option<String>,
    /// Number of data rows.
    pub rows: usize,
}

/// Column width heuristic: `max(12, header length + 2)`.
pub fn column_width(header: &str) -> usize {
    MIN_COLUMN_WIDTH.max(header.chars().count() + 2)
}

/// Sheet name for `category`, unique (case-insensitively) among `taken`.
///
/// Characters Excel rejects are replaced with `_` and the name is cut to 31 characters. A name
/// that collides with an earlier sheet gets a `~2`, `~3`, ... suffix, shortening the base so the
/// result still fits.
pub fn sheet_name_for(category: &str, taken: &[String]) -> String {
    let replaced: String = category
        .chars()
        .map(|c| if INVALID_SHEET_NAME_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = without_edge_apostrophes(&replaced);

    let is_taken = |name: &str| taken.iter().any(|t| t.to_lowercase() == name.to_lowercase());

    // Cutting can expose an apostrophe at the new end.
    let cut: String = cleaned.chars().take(MAX_SHEET_NAME_CHARS).collect();
    let base = without_edge_apostrophes(&cut);
    if !is_taken(&base) {
        return base;
    }

    let mut n = 2usize;
    loop {
        let suffix = format!("~{n}");
        let keep = MAX_SHEET_NAME_CHARS - suffix.chars().count();
        let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Excel rejects names that start or end with `'`; an empty result becomes `Sheet`.
fn without_edge_apostrophes(name: &str) -> String {
    let trimmed = name.trim_matches('\'');
    if trimmed.trim().is_empty() {
        "Sheet".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the report workbook in memory.
///
/// `metadata` are the always-kept columns present in `filtered`; `selected` the categories in
/// selection order (repeats are written once). Category sheets with no marked rows are omitted.
pub fn build_workbook(
    filtered: &DataSet,
    metadata: &[String],
    selected: &[String],
    observer: &dyn PipelineObserver,
    ctx: &StageContext,
) -> Result<(Workbook, Vec<SheetSummary>), XlsxError> {
    let mut workbook = Workbook::new();
    let mut sheets: Vec<SheetSummary> = Vec::new();

    write_table_sheet(workbook.add_worksheet(), ALL_SHEET, filtered)?;
    sheets.push(SheetSummary {
        name: ALL_SHEET.to_string(),
        category: None,
        rows: filtered.row_count(),
    });
    observer.on_note(ctx, Severity::Info, &format!("sheet '{ALL_SHEET}' saved"));

    let mut seen: Vec<&str> = Vec::new();
    for category in selected {
        if seen.contains(&category.as_str()) {
            continue;
        }
        seen.push(category);

        let marked = rows_marked_in(filtered, category);
        if marked.row_count() == 0 {
            observer.on_note(
                ctx,
                Severity::Info,
                &format!("no rows for category '{category}'; sheet will not be created"),
            );
            continue;
        }

        let columns: Vec<&str> = metadata
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(category.as_str()))
            .collect();
        let sheet_data = marked.project(&columns);

        let taken: Vec<String> = sheets.iter().map(|s| s.name.clone()).collect();
        let name = sheet_name_for(category, &taken);
        write_table_sheet(workbook.add_worksheet(), &name, &sheet_data)?;
        observer.on_note(
            ctx,
            Severity::Info,
            &format!("sheet '{name}' saved with {} records", sheet_data.row_count()),
        );
        sheets.push(SheetSummary {
            name,
            category: Some(category.clone()),
            rows: sheet_data.row_count(),
        });
    }

    Ok((workbook, sheets))
}

/// Build the workbook and write it to `path`, replacing any previous file.
pub fn write_workbook(
    filtered: &DataSet,
    metadata: &[String],
    selected: &[String],
    path: impl AsRef<Path>,
    observer: &dyn PipelineObserver,
    ctx: &StageContext,
) -> RegistryResult<Vec<SheetSummary>> {
    let path = path.as_ref();
    let (mut workbook, sheets) = build_workbook(filtered, metadata, selected, observer, ctx)
        .map_err(|e| RegistryError::persist(path, e))?;
    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| RegistryError::persist(path, e))?;
    write_atomically(path, &bytes).map_err(|e| RegistryError::persist(path, e))?;
    Ok(sheets)
}

/// Write headers and rows, wrap them in a table, and size the columns.
///
/// A table needs at least one data row, so a sheet without rows only gets its header line.
fn write_table_sheet(worksheet: &mut Worksheet, name: &str, data: &DataSet) -> Result<(), XlsxError> {
    worksheet.set_name(name)?;

    for (col, header) in data.columns.iter().enumerate() {
        worksheet.write_string(0, col as ColNum, header)?;
    }
    for (row_idx, row) in data.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as RowNum;
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row_num, col as ColNum, value)?;
            }
        }
    }

    if data.column_count() > 0 && data.row_count() > 0 {
        let columns: Vec<TableColumn> = data
            .columns
            .iter()
            .map(|h| TableColumn::new().set_header(h))
            .collect();
        let table = Table::new()
            .set_columns(&columns)
            .set_style(TableStyle::Medium2);
        worksheet.add_table(
            0,
            0,
            data.row_count() as RowNum,
            (data.column_count() - 1) as ColNum,
            &table,
        )?;
    }

    for (col, header) in data.columns.iter().enumerate() {
        worksheet.set_column_width(col as ColNum, column_width(header) as f64)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn column_width_has_a_floor_of_twelve() {
        assert_eq!(column_width("Lp."), 12);
        assert_eq!(column_width("Unikatowy Identyfikator Czasopisma"), 36);
        assert_eq!(column_width("Tytuł 1 ąęść"), 14);
    }

    #[test]
    fn short_names_are_kept() {
        assert_eq!(sheet_name_for("fizyka", &taken(&["All"])), "fizyka");
    }

    #[test]
    fn long_names_are_cut_to_31_chars() {
        let name = sheet_name_for(
            "nauki o zarządzaniu i jakości oraz ekonomia i finanse",
            &taken(&["All"]),
        );
        assert_eq!(name.chars().count(), 31);
        assert_eq!(name, "nauki o zarządzaniu i jakości o");
    }

    #[test]
    fn invalid_characters_are_replaced() {
        assert_eq!(sheet_name_for("a/b: c?", &[]), "a_b_ c_");
    }

    #[test]
    fn collisions_get_a_numbered_suffix_within_the_limit() {
        let long = "x".repeat(40);
        let first = sheet_name_for(&long, &[]);
        let second = sheet_name_for(&long, &[first.clone()]);
        let third = sheet_name_for(&long, &[first.clone(), second.clone()]);
        assert_eq!(second, format!("{}~2", "x".repeat(29)));
        assert_eq!(third, format!("{}~3", "x".repeat(29)));
        assert_eq!(second.chars().count(), 31);
    }

    #[test]
    fn apostrophe_exposed_by_the_cut_is_trimmed() {
        let category = format!("{}'tail", "a".repeat(30));
        let name = sheet_name_for(&category, &taken(&["All"]));
        assert_eq!(name, "a".repeat(30));

        let second = sheet_name_for(&category, &[name.clone()]);
        assert_eq!(second, format!("{}~2", "a".repeat(29)));
        assert!(!second.ends_with('\''));
    }

    #[test]
    fn names_of_only_apostrophes_fall_back_to_sheet() {
        assert_eq!(sheet_name_for("'''", &[]), "Sheet");
        assert_eq!(sheet_name_for("'quoted'", &[]), "quoted");
    }

    #[test]
    fn collision_check_ignores_case() {
        assert_eq!(sheet_name_for("all", &taken(&["All"])), "all~2");
    }
}
