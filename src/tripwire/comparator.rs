//! FIM-006: Integrity comparator — one full reconciliation pass.
//!
//! Load baseline → hash every immediate file in the watched directory →
//! classify against the baseline → emit events → persist.

use crate::core::error::{IntegrityError, Result};
use crate::core::state::BaselineStore;
use crate::core::types::{Baseline, ScanOutcome, ScanReport};
use crate::tripwire::eventlog::EventSink;
use crate::tripwire::hasher;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A file seen in the watched directory, with its digest or the hash failure.
#[derive(Debug, Clone)]
pub struct Observation {
    pub path: String,
    pub hash: std::result::Result<String, String>,
}

/// Runs reconciliation passes over one watched directory.
pub struct Comparator<'a> {
    watch_dir: PathBuf,
    store: &'a BaselineStore,
    sink: &'a dyn EventSink,
}

impl<'a> Comparator<'a> {
    pub fn new(
        watch_dir: impl Into<PathBuf>,
        store: &'a BaselineStore,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            watch_dir: watch_dir.into(),
            store,
            sink,
        }
    }

    /// Execute one pass. Any error returned is fatal and nothing was persisted.
    pub fn scan(&self) -> Result<ScanReport> {
        let mut baseline = self.store.load()?;
        let observations = observe_dir(&self.watch_dir)?;
        let report = reconcile(&mut baseline, observations);

        for finding in &report.findings {
            if let Some((level, message)) = finding.outcome.event(&finding.path) {
                self.sink.emit(level, &message);
            }
        }

        self.store.save(&baseline)?;
        tracing::debug!(
            unchanged = report.unchanged(),
            modified = report.modified(),
            new = report.new_files(),
            deleted = report.deleted(),
            unreadable = report.unreadable(),
            "pass complete"
        );
        Ok(report)
    }
}

/// List and hash the immediate non-directory entries of `dir`, in name order.
pub fn observe_dir(dir: &Path) -> Result<Vec<Observation>> {
    let read_err = |source| IntegrityError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = std::fs::read_dir(dir)
        .map_err(read_err)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_err)?;
    entries.sort_by_key(|e| e.file_name());

    let mut observations = Vec::with_capacity(entries.len());
    for entry in entries {
        let file_path = dir.join(entry.file_name());
        // Follows symlinks so a link to a directory is skipped too.
        if std::fs::metadata(&file_path).map(|m| m.is_dir()).unwrap_or(false) {
            continue;
        }
        let path = file_path.to_string_lossy().into_owned();
        tracing::debug!(path = %path, "hashing");
        let hash = hasher::hash_file(&file_path).map_err(|e| e.to_string());
        observations.push(Observation { path, hash });
    }
    Ok(observations)
}

/// Classify observations against `baseline` and update it in place.
///
/// Files whose hash failed count as observed: they are reported `Unreadable`,
/// never `Deleted`, and their baseline entry is left untouched.
pub fn reconcile(baseline: &mut Baseline, observations: Vec<Observation>) -> ScanReport {
    let mut report = ScanReport::default();
    let mut seen = BTreeSet::new();

    for obs in observations {
        seen.insert(obs.path.clone());
        let hash = match obs.hash {
            Ok(h) => h,
            Err(reason) => {
                report.push(obs.path, ScanOutcome::Unreadable { reason });
                continue;
            }
        };
        let outcome = match baseline.get(&obs.path) {
            None => ScanOutcome::New { hash: hash.clone() },
            Some(old) if old != hash => ScanOutcome::Modified {
                old: old.to_string(),
                new: hash.clone(),
            },
            Some(_) => ScanOutcome::Unchanged,
        };
        baseline.upsert(obs.path.clone(), hash);
        report.push(obs.path, outcome);
    }

    let deleted: Vec<String> = baseline
        .paths()
        .filter(|p| !seen.contains(*p))
        .map(str::to_string)
        .collect();
    for path in deleted {
        if let Some(hash) = baseline.remove(&path) {
            report.push(path, ScanOutcome::Deleted { hash });
        }
    }

    report
}
