//! Stage reporting.
//!
//! Every pipeline stage reports its outcome to a [`PipelineObserver`] handed to it by the caller
//! instead of writing to a process-wide sink. Stages stay testable with a recording observer, and
//! the binary wires in [`TracingObserver`].

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{RegistryError, RegistryResult};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (stage failed).
    Error,
    /// Critical error (file system or network failures).
    Critical,
}

/// Pipeline stage an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Download,
    Load,
    Classify,
    Select,
    Filter,
    Snapshot,
    Workbook,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Download => "download",
            Self::Load => "load",
            Self::Classify => "classify",
            Self::Select => "select",
            Self::Filter => "filter",
            Self::Snapshot => "snapshot",
            Self::Workbook => "workbook",
        };
        f.write_str(name)
    }
}

/// Context about a stage invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageContext {
    /// The stage reporting.
    pub stage: Stage,
    /// What the stage worked on: a path, a URL, or a short description.
    pub target: String,
}

impl StageContext {
    pub fn new(stage: Stage, target: impl Into<String>) -> Self {
        Self {
            stage,
            target: target.into(),
        }
    }

    pub fn for_path(stage: Stage, path: &Path) -> Self {
        Self::new(stage, path.display().to_string())
    }
}

/// Shape of a stage's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageStats {
    pub rows: usize,
    pub columns: usize,
}

/// Observer interface for stage outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait PipelineObserver: Send + Sync {
    /// Called when a stage succeeds.
    fn on_success(&self, _ctx: &StageContext, _stats: StageStats) {}

    /// Called for intermediate details (a sheet skipped, a missing metadata column, ...).
    fn on_note(&self, _ctx: &StageContext, _severity: Severity, _message: &str) {}

    /// Called when a stage fails.
    fn on_failure(&self, _ctx: &StageContext, _severity: Severity, _error: &RegistryError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &StageContext, severity: Severity, error: &RegistryError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Reports a stage result: `on_success` with `stats(value)`, or `on_failure` (and `on_alert`
/// when the severity is at or above `alert_at_or_above`).
pub(crate) fn report_outcome<T>(
    observer: &dyn PipelineObserver,
    ctx: &StageContext,
    alert_at_or_above: Severity,
    result: &RegistryResult<T>,
    stats: impl FnOnce(&T) -> StageStats,
) {
    match result {
        Ok(value) => observer.on_success(ctx, stats(value)),
        Err(e) => {
            let sev = e.severity();
            observer.on_failure(ctx, sev, e);
            if sev >= alert_at_or_above {
                observer.on_alert(ctx, sev, e);
            }
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_success(&self, ctx: &StageContext, stats: StageStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_note(&self, ctx: &StageContext, severity: Severity, message: &str) {
        for o in &self.observers {
            o.on_note(ctx, severity, message);
        }
    }

    fn on_failure(&self, ctx: &StageContext, severity: Severity, error: &RegistryError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &StageContext, severity: Severity, error: &RegistryError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_success(&self, ctx: &StageContext, stats: StageStats) {
        tracing::info!(
            stage = %ctx.stage,
            subject = %ctx.target,
            rows = stats.rows,
            columns = stats.columns,
            "stage finished"
        );
    }

    fn on_note(&self, ctx: &StageContext, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::debug!(stage = %ctx.stage, subject = %ctx.target, "{message}"),
            Severity::Warning => tracing::warn!(stage = %ctx.stage, subject = %ctx.target, "{message}"),
            Severity::Error | Severity::Critical => {
                tracing::error!(stage = %ctx.stage, subject = %ctx.target, "{message}")
            }
        }
    }

    fn on_failure(&self, ctx: &StageContext, severity: Severity, error: &RegistryError) {
        tracing::error!(
            stage = %ctx.stage,
            subject = %ctx.target,
            severity = ?severity,
            error = %error_chain(error),
            "stage failed"
        );
    }

    fn on_alert(&self, ctx: &StageContext, severity: Severity, error: &RegistryError) {
        tracing::error!(
            stage = %ctx.stage,
            subject = %ctx.target,
            severity = ?severity,
            error = %error_chain(error),
            "ALERT"
        );
    }
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_success(&self, ctx: &StageContext, stats: StageStats) {
        eprintln!(
            "[{}][ok] target={} rows={} columns={}",
            ctx.stage, ctx.target, stats.rows, stats.columns
        );
    }

    fn on_note(&self, ctx: &StageContext, severity: Severity, message: &str) {
        eprintln!("[{}][{:?}] target={} {}", ctx.stage, severity, ctx.target, message);
    }

    fn on_failure(&self, ctx: &StageContext, severity: Severity, error: &RegistryError) {
        eprintln!(
            "[{}][{:?}] target={} err={}",
            ctx.stage,
            severity,
            ctx.target,
            error_chain(error)
        );
    }

    fn on_alert(&self, ctx: &StageContext, severity: Severity, error: &RegistryError) {
        eprintln!(
            "[ALERT][{}][{:?}] target={} err={}",
            ctx.stage,
            severity,
            ctx.target,
            error_chain(error)
        );
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_success(&self, ctx: &StageContext, stats: StageStats) {
        self.append_line(&format!(
            "{} ok stage={} target={} rows={} columns={}",
            unix_ts(),
            ctx.stage,
            ctx.target,
            stats.rows,
            stats.columns
        ));
    }

    fn on_note(&self, ctx: &StageContext, severity: Severity, message: &str) {
        self.append_line(&format!(
            "{} note severity={:?} stage={} target={} {}",
            unix_ts(),
            severity,
            ctx.stage,
            ctx.target,
            message
        ));
    }

    fn on_failure(&self, ctx: &StageContext, severity: Severity, error: &RegistryError) {
        self.append_line(&format!(
            "{} fail severity={:?} stage={} target={} err={}",
            unix_ts(),
            severity,
            ctx.stage,
            ctx.target,
            error_chain(error)
        ));
    }

    fn on_alert(&self, ctx: &StageContext, severity: Severity, error: &RegistryError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} stage={} target={} err={}",
            unix_ts(),
            severity,
            ctx.stage,
            ctx.target,
            error_chain(error)
        ));
    }
}

/// Renders an error with all of its sources, outermost first.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut out = error.to_string();
    let mut cur = error.source();
    while let Some(err) = cur {
        let text = err.to_string();
        // thiserror messages usually embed the source already.
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        cur = err.source();
    }
    out
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
