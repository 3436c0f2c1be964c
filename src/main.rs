//! Journal registry CLI.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use clap::Parser;
use journal_registry::logging::{LogConfig, LogFormat, init_logging};
use journal_registry::observability::{PipelineObserver, TracingObserver, error_chain};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, ViewFormatArg};
use crate::commands::{CommandError, run_columns, run_convert, run_view};
use crate::summary::{print_columns, print_run_summary, print_view_json, print_view_table};

fn main() {
    let cli = Cli::parse();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let observer: Arc<dyn PipelineObserver> = Arc::new(TracingObserver);
    let result = match &cli.command {
        Command::Convert(args) => run_convert(args, observer).map(|s| print_run_summary(&s)),
        Command::Columns(args) => run_columns(args, observer).map(|lines| print_columns(&lines)),
        Command::View(args) => run_view(args).and_then(|view| match args.format {
            ViewFormatArg::Table => {
                print_view_table(&view);
                Ok(())
            }
            ViewFormatArg::Json => print_view_json(&view).map_err(CommandError::from),
        }),
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!(error = %error_chain(&error), "run failed");
            eprintln!("error: {}", error.operator_message());
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !cli.verbosity.is_present();
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = cli.log_file.is_none() && io::stderr().is_terminal();
    config
}
