use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CellError, ErrorKind};
use crate::parser::ParseWarning;

use super::unified::Selection;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadSeverity {
    /// The call failed because of its arguments or input contents.
    Error,
    /// The call failed because the input could not be opened or read.
    Critical,
}

impl ReadSeverity {
    /// Severity of a failed read.
    pub fn for_error(error: &CellError) -> Self {
        match error.kind() {
            ErrorKind::Io => ReadSeverity::Critical,
            ErrorKind::Usage | ErrorKind::Config | ErrorKind::AddressSyntax | ErrorKind::AddressRange => {
                ReadSeverity::Error
            }
        }
    }
}

/// Context about one read call.
#[derive(Debug, Clone)]
pub struct ReadContext {
    /// The input path.
    pub path: PathBuf,
    /// Which part of the file was requested.
    pub selection: Selection,
}

/// Stats reported on a successful read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    pub rows: usize,
    pub cols: usize,
}

/// Observer interface for read outcomes and warnings.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ReadObserver: Send + Sync {
    /// Called when a read succeeds.
    fn on_success(&self, _ctx: &ReadContext, _stats: ReadStats) {}

    /// Called when a read fails.
    fn on_failure(&self, _ctx: &ReadContext, _severity: ReadSeverity, _error: &CellError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &CellError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called for each non-fatal parse warning, before `on_success`.
    fn on_warning(&self, _ctx: &ReadContext, _warning: &ParseWarning) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ReadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn ReadObserver>>) -> Self {
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

impl ReadObserver for CompositeObserver {
    fn on_success(&self, ctx: &ReadContext, stats: ReadStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &CellError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &CellError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_warning(&self, ctx: &ReadContext, warning: &ParseWarning) {
        for o in &self.observers {
            o.on_warning(ctx, warning);
        }
    }
}

/// Logs read events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ReadObserver for StdErrObserver {
    fn on_success(&self, ctx: &ReadContext, stats: ReadStats) {
        eprintln!(
            "[csv2cell][ok] path={} selection={} size={}x{}",
            ctx.path.display(),
            ctx.selection,
            stats.rows,
            stats.cols
        );
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &CellError) {
        eprintln!(
            "[csv2cell][{:?}] path={} err={}",
            severity,
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &CellError) {
        eprintln!(
            "[ALERT][csv2cell][{:?}] path={} err={}",
            severity,
            ctx.path.display(),
            error
        );
    }

    fn on_warning(&self, ctx: &ReadContext, warning: &ParseWarning) {
        eprintln!(
            "[csv2cell][Warning] path={} {}",
            ctx.path.display(),
            warning
        );
    }
}

/// Appends read events to a local log file.
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

impl ReadObserver for FileObserver {
    fn on_success(&self, ctx: &ReadContext, stats: ReadStats) {
        self.append_line(&format!(
            "{} ok path={} selection={} size={}x{}",
            unix_ts(),
            ctx.path.display(),
            ctx.selection,
            stats.rows,
            stats.cols
        ));
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &CellError) {
        self.append_line(&format!(
            "{} fail severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &CellError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            error
        ));
    }

    fn on_warning(&self, ctx: &ReadContext, warning: &ParseWarning) {
        self.append_line(&format!(
            "{} warning path={} {}",
            unix_ts(),
            ctx.path.display(),
            warning
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
