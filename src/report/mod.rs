//! Report writer: the reusable snapshot and the multi-sheet workbook.
//!
//! [`write_report`] writes the snapshot first and the workbook second. Each file is replaced
//! atomically, but the pair is not: if the workbook fails, the new snapshot stays in place.

pub(crate) mod atomic;
pub mod snapshot;
pub mod workbook;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::RegistryResult;
use crate::observability::{
    NoopObserver, PipelineObserver, Severity, Stage, StageContext, StageStats, report_outcome,
};
use crate::types::{DataSet, Schema};

pub use snapshot::{SNAPSHOT_MAGIC, SNAPSHOT_VERSION, read_snapshot, write_snapshot};
pub use workbook::{ALL_SHEET, SheetSummary, build_workbook, sheet_name_for, write_workbook};

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_SNAPSHOT_PATH: &str = "dane_filtered.bin";

/// Default workbook location, relative to the working directory.
pub const DEFAULT_WORKBOOK_PATH: &str = "baza_czasopism.xlsx";

/// Options controlling [`write_report`].
#[derive(Clone)]
pub struct ReportOptions {
    pub snapshot_path: PathBuf,
    pub workbook_path: PathBuf,
    /// Metadata descriptor; category sheets carry its fields present in the dataset.
    pub schema: Schema,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for ReportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportOptions")
            .field("snapshot_path", &self.snapshot_path)
            .field("workbook_path", &self.workbook_path)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK_PATH),
            schema: Schema::default(),
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// What [`write_report`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub snapshot_path: PathBuf,
    pub workbook_path: PathBuf,
    /// Sheets in workbook order, `"All"` first.
    pub sheets: Vec<SheetSummary>,
}

/// Persist `filtered` as a snapshot and render the workbook for `selected` categories.
///
/// # Errors
///
/// [`crate::RegistryError::Persist`] naming the artifact that failed. When the workbook fails the
/// snapshot has already been replaced.
pub fn write_report(
    filtered: &DataSet,
    selected: &[String],
    options: &ReportOptions,
) -> RegistryResult<ReportOutcome> {
    let observer: &dyn PipelineObserver = match options.observer.as_deref() {
        Some(obs) => obs,
        None => &NoopObserver,
    };
    let stats = StageStats {
        rows: filtered.row_count(),
        columns: filtered.column_count(),
    };

    let snapshot_ctx = StageContext::for_path(Stage::Snapshot, &options.snapshot_path);
    let snapshot_result = write_snapshot(filtered, &options.snapshot_path);
    report_outcome(observer, &snapshot_ctx, options.alert_at_or_above, &snapshot_result, |_| stats);
    snapshot_result?;

    let metadata = options.schema.present_in(&filtered.columns);
    let workbook_ctx = StageContext::for_path(Stage::Workbook, &options.workbook_path);
    let workbook_result = write_workbook(
        filtered,
        &metadata,
        selected,
        &options.workbook_path,
        observer,
        &workbook_ctx,
    );
    report_outcome(observer, &workbook_ctx, options.alert_at_or_above, &workbook_result, |_| stats);
    let sheets = workbook_result?;

    Ok(ReportOutcome {
        snapshot_path: options.snapshot_path.clone(),
        workbook_path: options.workbook_path.clone(),
        sheets,
    })
}
