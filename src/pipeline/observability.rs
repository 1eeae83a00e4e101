use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::MergeError;
use crate::merge::JoinPolicy;

/// Severity classification used for observer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MergeSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (the request succeeded but the result deserves a
    /// second look, e.g. an empty intersection).
    Warning,
    /// Error-level event (the request failed).
    Error,
    /// Critical error (I/O or other infrastructure failures).
    Critical,
}

/// Context about a merge request.
#[derive(Debug, Clone)]
pub struct MergeContext {
    /// The source being merged: a file name, or a summary for multi-file
    /// requests. Failure callbacks carry the specific file that failed.
    pub source: String,
    /// Join policy in effect for the request.
    pub policy: JoinPolicy,
}

/// Stats reported on successful merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    /// Number of input tables fed to the concatenator.
    pub tables: usize,
    /// Row count of the merged table.
    pub rows: usize,
    /// Column count of the merged table.
    pub columns: usize,
}

/// Observer interface for merge outcomes.
///
/// Implementors can record metrics, logs, or surface warnings to the user.
/// The pipeline never requires an observer; without one there are no logging
/// side effects.
pub trait MergeObserver: Send + Sync {
    /// Called when a merge request succeeds.
    fn on_success(&self, _ctx: &MergeContext, _stats: MergeStats) {}

    /// Called when a merge produced a valid but suspicious result, e.g. an
    /// intersection merge where the inputs share no columns.
    fn on_warning(&self, _ctx: &MergeContext, _message: &str) {}

    /// Called when a merge request fails.
    fn on_failure(&self, _ctx: &MergeContext, _severity: MergeSeverity, _error: &MergeError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn MergeObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn MergeObserver>>) -> Self {
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

impl MergeObserver for CompositeObserver {
    fn on_success(&self, ctx: &MergeContext, stats: MergeStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_warning(&self, ctx: &MergeContext, message: &str) {
        for o in &self.observers {
            o.on_warning(ctx, message);
        }
    }

    fn on_failure(&self, ctx: &MergeContext, severity: MergeSeverity, error: &MergeError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }
}

/// Logs merge events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl MergeObserver for StdErrObserver {
    fn on_success(&self, ctx: &MergeContext, stats: MergeStats) {
        eprintln!(
            "[merge][ok] source={} policy={:?} tables={} rows={} columns={}",
            ctx.source, ctx.policy, stats.tables, stats.rows, stats.columns
        );
    }

    fn on_warning(&self, ctx: &MergeContext, message: &str) {
        eprintln!(
            "[merge][warn] source={} policy={:?} {message}",
            ctx.source, ctx.policy
        );
    }

    fn on_failure(&self, ctx: &MergeContext, severity: MergeSeverity, error: &MergeError) {
        eprintln!(
            "[merge][{severity:?}] source={} policy={:?} err={error}",
            ctx.source, ctx.policy
        );
    }
}

/// Appends merge events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are
    /// ignored.
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

impl MergeObserver for FileObserver {
    fn on_success(&self, ctx: &MergeContext, stats: MergeStats) {
        self.append_line(&format!(
            "{} ok source={} policy={:?} tables={} rows={} columns={}",
            unix_ts(),
            ctx.source,
            ctx.policy,
            stats.tables,
            stats.rows,
            stats.columns
        ));
    }

    fn on_warning(&self, ctx: &MergeContext, message: &str) {
        self.append_line(&format!(
            "{} warn source={} policy={:?} {message}",
            unix_ts(),
            ctx.source,
            ctx.policy
        ));
    }

    fn on_failure(&self, ctx: &MergeContext, severity: MergeSeverity, error: &MergeError) {
        self.append_line(&format!(
            "{} fail severity={severity:?} source={} policy={:?} err={error}",
            unix_ts(),
            ctx.source,
            ctx.policy
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
