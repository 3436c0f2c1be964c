//! Subcommand implementations.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use journal_registry::download::{DEFAULT_SOURCE_URL, default_download_path, download};
use journal_registry::observability::{PipelineObserver, Severity};
use journal_registry::pipeline::{Pipeline, PipelineOptions, RunSummary};
use journal_registry::processing::{enumerate, parse_indices};
use journal_registry::types::Schema;
use journal_registry::viewer::{CategoryFilter, DEFAULT_POINTS_RANGE, View, ViewModel, load_snapshot};
use journal_registry::RegistryError;

use crate::cli::{ColumnsArgs, ConvertArgs, ViewArgs};

const PATH_PROMPT: &str =
    "Path to the source file (leave blank to download the published list): ";
const COLUMNS_PROMPT: &str = "Column numbers to keep, separated by commas: ";

/// Failures of the binary: pipeline errors plus terminal I/O.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to read from the terminal: {0}")]
    Prompt(#[source] io::Error),

    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Short text printed after `error:`.
    pub fn operator_message(&self) -> String {
        match self {
            Self::Registry(e) => e.operator_message(),
            other => other.to_string(),
        }
    }
}

/// Resolve the source, ask for categories if needed, and run the pipeline.
pub fn run_convert(
    args: &ConvertArgs,
    observer: Arc<dyn PipelineObserver>,
) -> Result<RunSummary, CommandError> {
    let source = resolve_source(args, observer.as_ref())?;

    let pipeline = Pipeline::new(PipelineOptions {
        snapshot_path: args.snapshot.clone(),
        workbook_path: args.workbook.clone(),
        observer: Some(observer),
        ..PipelineOptions::default()
    });

    pipeline.run_with(&source, |categorical| {
        let input = match &args.columns {
            Some(list) => list.clone(),
            None => {
                println!("Available columns:");
                for line in enumerate(categorical) {
                    println!("{line}");
                }
                prompt(COLUMNS_PROMPT)?
            }
        };
        Ok(parse_indices(&input)?)
    })
}

/// Print the numbered categorical columns of `args.path`.
pub fn run_columns(
    args: &ColumnsArgs,
    observer: Arc<dyn PipelineObserver>,
) -> Result<Vec<String>, CommandError> {
    let pipeline = Pipeline::new(PipelineOptions {
        observer: Some(observer),
        ..PipelineOptions::default()
    });
    let dataset = pipeline.load(&args.path)?;
    let classes = pipeline.classify(&dataset);
    Ok(enumerate(&classes.categorical))
}

/// Load the snapshot and apply the view flags on top of the default view.
pub fn run_view(args: &ViewArgs) -> Result<View, CommandError> {
    let dataset = load_snapshot(&args.snapshot)?;
    let mut model = ViewModel::initial(&dataset, &Schema::journal_registry());

    if let Some(columns) = &args.columns {
        let columns = columns.iter().map(|c| c.trim().to_string()).collect();
        model = model.with_visible_columns(columns);
    }
    if args.min_points.is_some() || args.max_points.is_some() {
        let (min, max) = DEFAULT_POINTS_RANGE;
        model = model.with_points_range(args.min_points.unwrap_or(min), args.max_points.unwrap_or(max));
    }
    if let Some(category) = &args.category {
        model = model.with_category(CategoryFilter::Only(category.clone()));
    }

    Ok(model.render(&dataset))
}

fn resolve_source(
    args: &ConvertArgs,
    observer: &dyn PipelineObserver,
) -> Result<PathBuf, CommandError> {
    if let Some(path) = &args.path {
        return Ok(path.clone());
    }

    let answer = match &args.url {
        Some(_) => String::new(),
        None => prompt(PATH_PROMPT)?,
    };
    if !answer.is_empty() {
        return Ok(PathBuf::from(answer));
    }

    let url = args.url.as_deref().unwrap_or(DEFAULT_SOURCE_URL);
    let target = default_download_path();
    download(url, &target, observer, Severity::Critical)?;
    Ok(target)
}

/// Print `message` and read one trimmed line from stdin.
fn prompt(message: &str) -> Result<String, CommandError> {
    let mut stdout = io::stdout();
    write!(stdout, "{message}").map_err(CommandError::Prompt)?;
    stdout.flush().map_err(CommandError::Prompt)?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(CommandError::Prompt)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_keep_their_operator_message() {
        let err = CommandError::from(RegistryError::SelectionParse {
            token: "a".to_string(),
        });
        assert_eq!(err.operator_message(), "Invalid column numbers provided.");
    }

    #[test]
    fn prompt_errors_describe_the_terminal_failure() {
        let err = CommandError::Prompt(io::Error::other("closed"));
        assert_eq!(
            err.operator_message(),
            "failed to read from the terminal: closed"
        );
    }
}
