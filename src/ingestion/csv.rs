//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{RegistryError, RegistryResult};
use crate::types::DataSet;

use super::headers::dedupe_headers;

/// Read a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The first record is the header.
/// - Every cell is kept as text, exactly as written (no trimming, no type inference).
/// - Short records are padded with empty strings; extra trailing cells are dropped.
pub fn load_csv_from_path(path: impl AsRef<Path>) -> RegistryResult<DataSet> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| RegistryError::load(path, e))?;
    load_csv_from_reader(&mut rdr).map_err(|e| RegistryError::load(path, e))
}

/// Read CSV data from an existing CSV reader.
pub fn load_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> Result<DataSet, csv::Error> {
    let headers = rdr.headers()?.clone();
    let columns = dedupe_headers(headers.iter().map(str::to_owned).collect());
    let width = columns.len();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().take(width).map(str::to_owned).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(DataSet::new(columns, rows))
}
