//! Linear conversion pipeline: load → classify → select → filter → report.
//!
//! Every stage reports to the configured observer, and the first failure aborts the run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{RegistryError, RegistryResult};
use crate::ingestion::{LoadOptions, load};
use crate::observability::{
    NoopObserver, PipelineObserver, Severity, Stage, StageContext, StageStats, report_outcome,
};
use crate::processing::{ColumnClasses, classify, filter, select};
use crate::report::{
    DEFAULT_SNAPSHOT_PATH, DEFAULT_WORKBOOK_PATH, ReportOptions, SheetSummary, write_report,
};
use crate::types::{DataSet, HeaderMapping, Schema};

/// Configuration for a [`Pipeline`].
#[derive(Clone)]
pub struct PipelineOptions {
    pub schema: Schema,
    pub header_mapping: HeaderMapping,
    pub snapshot_path: PathBuf,
    pub workbook_path: PathBuf,
    /// Observer every stage reports to.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("schema_fields", &self.schema.fields.len())
            .field("header_mapping", &self.header_mapping.version)
            .field("snapshot_path", &self.snapshot_path)
            .field("workbook_path", &self.workbook_path)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            header_mapping: HeaderMapping::default(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK_PATH),
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub loaded_rows: usize,
    pub filtered_rows: usize,
    /// Selected category names, in selection order.
    pub selected: Vec<String>,
    pub snapshot_path: PathBuf,
    pub workbook_path: PathBuf,
    pub sheets: Vec<SheetSummary>,
}

/// Runs the conversion end to end.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    fn observer(&self) -> &dyn PipelineObserver {
        match self.options.observer.as_deref() {
            Some(obs) => obs,
            None => &NoopObserver,
        }
    }

    /// Load `source` with the configured schema and header mapping.
    pub fn load(&self, source: impl AsRef<Path>) -> RegistryResult<DataSet> {
        let options = LoadOptions {
            format: None,
            header_mapping: self.options.header_mapping.clone(),
            schema: self.options.schema.clone(),
            observer: self.options.observer.clone(),
            alert_at_or_above: self.options.alert_at_or_above,
        };
        load(source, &options)
    }

    /// Split the columns of `dataset` into metadata and categorical columns.
    pub fn classify(&self, dataset: &DataSet) -> ColumnClasses {
        let classes = classify(&dataset.columns, &self.options.schema);
        let ctx = StageContext::new(Stage::Classify, "columns");
        self.observer().on_note(
            &ctx,
            Severity::Info,
            &format!("available categorical columns: {:?}", classes.categorical),
        );
        self.observer().on_success(
            &ctx,
            StageStats {
                rows: dataset.row_count(),
                columns: classes.categorical.len(),
            },
        );
        classes
    }

    /// Resolve 1-based `indices` into categorical column names.
    pub fn select(&self, indices: &[i64], categorical: &[String]) -> RegistryResult<Vec<String>> {
        let ctx = StageContext::new(Stage::Select, format!("{indices:?}"));
        let result = select(indices, categorical);
        if let Ok(names) = &result {
            self.observer()
                .on_note(&ctx, Severity::Info, &format!("selected columns: {names:?}"));
        }
        report_outcome(self.observer(), &ctx, self.options.alert_at_or_above, &result, |names| {
            StageStats {
                rows: 0,
                columns: names.len(),
            }
        });
        result
    }

    /// Keep rows marked in any of `selected` and project the columns.
    pub fn filter(&self, dataset: &DataSet, classes: &ColumnClasses, selected: &[String]) -> DataSet {
        let out = filter(dataset, &classes.metadata, selected);
        self.observer().on_success(
            &StageContext::new(Stage::Filter, format!("{selected:?}")),
            StageStats {
                rows: out.row_count(),
                columns: out.column_count(),
            },
        );
        out
    }

    /// Run every stage with the given indices.
    pub fn run(&self, source: impl AsRef<Path>, indices: &[i64]) -> RegistryResult<RunSummary> {
        let indices = indices.to_vec();
        self.run_with(source, move |_| Ok::<_, RegistryError>(indices))
    }

    /// Run every stage, asking `choose` for indices once the categorical columns are known.
    ///
    /// `choose` receives the categorical column names in display order; an error from it aborts
    /// the run before anything is written.
    pub fn run_with<F, E>(&self, source: impl AsRef<Path>, choose: F) -> Result<RunSummary, E>
    where
        F: FnOnce(&[String]) -> Result<Vec<i64>, E>,
        E: From<RegistryError>,
    {
        let dataset = self.load(source)?;
        let classes = self.classify(&dataset);
        let indices = choose(&classes.categorical)?;
        let selected = self.select(&indices, &classes.categorical)?;
        let filtered = self.filter(&dataset, &classes, &selected);

        let report_options = ReportOptions {
            snapshot_path: self.options.snapshot_path.clone(),
            workbook_path: self.options.workbook_path.clone(),
            schema: self.options.schema.clone(),
            observer: self.options.observer.clone(),
            alert_at_or_above: self.options.alert_at_or_above,
        };
        let outcome = write_report(&filtered, &selected, &report_options)?;

        Ok(RunSummary {
            loaded_rows: dataset.row_count(),
            filtered_rows: filtered.row_count(),
            selected,
            snapshot_path: outcome.snapshot_path,
            workbook_path: outcome.workbook_path,
            sheets: outcome.sheets,
        })
    }
}
