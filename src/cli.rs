//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use journal_registry::report::{DEFAULT_SNAPSHOT_PATH, DEFAULT_WORKBOOK_PATH};

#[derive(Parser)]
#[command(
    name = "journal-registry",
    version,
    about = "Filter the journal registry by category into a snapshot and an Excel report",
    long_about = "Filter the journal registry by category.\n\n\
                  Reads the published journal list (CSV or Excel), keeps the journals marked in \
                  the chosen categories, and writes a reusable snapshot plus a workbook with one \
                  sheet per category."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Filter a source file and write the snapshot and workbook.
    Convert(ConvertArgs),

    /// List the categorical columns of a source file.
    Columns(ColumnsArgs),

    /// Show the journals stored in a snapshot.
    View(ViewArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Source file (.csv, .xlsx, ...). Prompted for when omitted; a blank answer downloads the
    /// published list.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Comma-separated 1-based category numbers, e.g. "1,3". Prompted for when omitted.
    #[arg(long = "columns", value_name = "LIST")]
    pub columns: Option<String>,

    /// Where to write the snapshot.
    #[arg(long = "snapshot", value_name = "PATH", default_value = DEFAULT_SNAPSHOT_PATH)]
    pub snapshot: PathBuf,

    /// Where to write the workbook.
    #[arg(long = "workbook", value_name = "PATH", default_value = DEFAULT_WORKBOOK_PATH)]
    pub workbook: PathBuf,

    /// Source URL used when no path is given.
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,
}

#[derive(Args)]
pub struct ColumnsArgs {
    /// Source file (.csv, .xlsx, ...).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ViewArgs {
    /// Snapshot written by `convert`.
    #[arg(long = "snapshot", value_name = "PATH", default_value = DEFAULT_SNAPSHOT_PATH)]
    pub snapshot: PathBuf,

    /// Lowest points value shown (inclusive).
    #[arg(long = "min-points", value_name = "N")]
    pub min_points: Option<f64>,

    /// Highest points value shown (inclusive).
    #[arg(long = "max-points", value_name = "N")]
    pub max_points: Option<f64>,

    /// Only show journals marked in this category.
    #[arg(long = "category", value_name = "NAME")]
    pub category: Option<String>,

    /// Comma-separated column names to show instead of the defaults.
    #[arg(long = "columns", value_name = "LIST", value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ViewFormatArg,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// How `view` prints its rows.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewFormatArg {
    Table,
    Json,
}
