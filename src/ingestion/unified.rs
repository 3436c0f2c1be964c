//! Unified loading entrypoint.
//!
//! Most callers should use [`load`], which reads a source table into an in-memory
//! [`crate::types::DataSet`] of canonical text values.
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`crate::observability::PipelineObserver`] is provided, success/failure/alerts and
//!   load-time schema warnings are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{RegistryError, RegistryResult};
use crate::observability::{
    PipelineObserver, Severity, Stage, StageContext, StageStats, report_outcome,
};
use crate::types::{DataSet, HeaderMapping, Schema};

use super::{csv, excel};

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values, single header row.
    Csv,
    /// Spreadsheet/workbook formats with the two-row registry header.
    Excel,
}

impl SourceFormat {
    /// Parse a source format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> RegistryResult<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| RegistryError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
    }
}

/// Options controlling [`load`].
///
/// Use [`Default`] for the published journal registry layout.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<SourceFormat>,
    /// Positional names for blank spreadsheet header cells.
    pub header_mapping: HeaderMapping,
    /// Metadata descriptor used for load-time validation.
    pub schema: Schema,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("header_mapping", &self.header_mapping.version)
            .field("schema_fields", &self.schema.fields.len())
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            header_mapping: HeaderMapping::default(),
            schema: Schema::default(),
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Load a source table from `path`.
///
/// - CSV: header in row 0, all cells read as text.
/// - Spreadsheet: first worksheet, header in row 0, row 1 discarded, blank leading header cells
///   named by [`LoadOptions::header_mapping`].
///
/// Missing required metadata columns are reported to the observer as a warning; they do not fail
/// the load.
///
/// # Errors
///
/// - [`RegistryError::UnsupportedFormat`] for an unrecognized (or missing) extension
/// - [`RegistryError::Load`] for I/O failures and malformed content
///
/// # Examples
///
/// ```no_run
/// use journal_registry::ingestion::{load, LoadOptions};
///
/// # fn main() -> Result<(), journal_registry::RegistryError> {
/// let ds = load("registry.xlsx", &LoadOptions::default())?;
/// println!("rows={} columns={}", ds.row_count(), ds.column_count());
/// # Ok(())
/// # }
/// ```
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> RegistryResult<DataSet> {
    let path = path.as_ref();
    let ctx = StageContext::for_path(Stage::Load, path);

    let result = match options.format {
        Some(f) => Ok(f),
        None => SourceFormat::from_path(path),
    }
    .and_then(|format| match format {
        SourceFormat::Csv => csv::load_csv_from_path(path),
        SourceFormat::Excel => excel::load_excel_from_path(path, &options.header_mapping),
    });

    if let Some(obs) = options.observer.as_deref() {
        if let Ok(ds) = &result {
            let missing = options.schema.missing_from(&ds.columns);
            if !missing.is_empty() {
                obs.on_note(
                    &ctx,
                    Severity::Warning,
                    &format!("missing metadata columns: {missing:?}"),
                );
            }
        }
        report_outcome(obs, &ctx, options.alert_at_or_above, &result, |ds| StageStats {
            rows: ds.row_count(),
            columns: ds.column_count(),
        });
    }

    result
}
