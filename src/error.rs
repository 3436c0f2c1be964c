use std::path::PathBuf;

use thiserror::Error;

use crate::observability::Severity;

/// Convenience result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Error type returned by every pipeline stage.
///
/// This is a single error enum shared across loading, selection, persistence and download; each
/// stage produces exactly one failure class and the pipeline aborts on the first one.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The source file extension is neither delimited text nor a recognized spreadsheet format.
    #[error("unsupported file format: {} (use CSV or Excel)", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The source (or a snapshot) could not be read or parsed.
    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadFailure,
    },

    /// A token of the category selection input is not an integer.
    #[error("invalid column number '{token}'")]
    SelectionParse { token: String },

    /// One or more selected indices fall outside `1..=available`.
    #[error("invalid column numbers: {invalid:?} (valid range is 1..={available})")]
    Selection { invalid: Vec<i64>, available: usize },

    /// The snapshot or workbook could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: PersistFailure,
    },

    /// The default remote source could not be fetched.
    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: DownloadFailure,
    },
}

/// Underlying cause of a [`RegistryError::Load`].
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("snapshot decode error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// Content parsed but does not have the expected shape.
    #[error("{0}")]
    Malformed(String),
}

/// Underlying cause of a [`RegistryError::Persist`].
#[derive(Debug, Error)]
pub enum PersistFailure {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("snapshot encode error: {0}")]
    Snapshot(#[from] bincode::Error),
}

/// Underlying cause of a [`RegistryError::Download`].
#[derive(Debug, Error)]
pub enum DownloadFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with HTTP {0}")]
    Status(u16),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    pub(crate) fn load(path: impl Into<PathBuf>, source: impl Into<LoadFailure>) -> Self {
        Self::Load {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            source: LoadFailure::Malformed(message.into()),
        }
    }

    pub(crate) fn persist(path: impl Into<PathBuf>, source: impl Into<PersistFailure>) -> Self {
        Self::Persist {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Severity used for observer callbacks and alert thresholds.
    ///
    /// Infrastructure failures (file system, network) are `Critical`; content and input problems
    /// are `Error`.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Load { source, .. } => match source {
                LoadFailure::Io(_) => Severity::Critical,
                LoadFailure::Csv(err) => match err.kind() {
                    csv::ErrorKind::Io(_) => Severity::Critical,
                    _ => Severity::Error,
                },
                LoadFailure::Excel(calamine::Error::Io(_)) => Severity::Critical,
                _ => Severity::Error,
            },
            Self::Persist { .. } | Self::Download { .. } => Severity::Critical,
            Self::UnsupportedFormat { .. } | Self::SelectionParse { .. } | Self::Selection { .. } => {
                Severity::Error
            }
        }
    }

    /// Short message for the operator; the full error chain belongs in the logs.
    pub fn operator_message(&self) -> String {
        match self {
            Self::UnsupportedFormat { .. } => "Unsupported file format. Use CSV or Excel.".to_string(),
            Self::Load { path, .. } => format!("Error loading {}. Check logs.", path.display()),
            Self::SelectionParse { .. } => "Invalid column numbers provided.".to_string(),
            Self::Selection { invalid, .. } => format!("Invalid column numbers: {invalid:?}"),
            Self::Persist { path, .. } => format!("Error saving {}. Check logs.", path.display()),
            Self::Download { .. } => "Error downloading the file. Check logs.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_load_failures_are_critical() {
        let err = RegistryError::load(
            "missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        );
        assert_eq!(err.severity(), Severity::Critical);
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn selection_errors_report_every_invalid_index() {
        let err = RegistryError::Selection {
            invalid: vec![7, 0],
            available: 5,
        };
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(err.operator_message(), "Invalid column numbers: [7, 0]");
        assert!(err.to_string().contains("1..=5"));
    }

    #[test]
    fn malformed_content_is_not_critical() {
        let err = RegistryError::malformed("book.xlsx", "workbook has no sheets");
        assert_eq!(err.severity(), Severity::Error);
        assert!(err.to_string().contains("workbook has no sheets"));
    }
}
