//! FIM-001: Data model — baseline mapping, scan outcomes, event levels.
//!
//! The baseline serializes as a flat JSON object (path → hex digest). Keys are
//! kept in a `BTreeMap` so the persisted file is canonical.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Baseline
// ============================================================================

/// One tracked file and its last-observed content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineEntry {
    pub path: String,
    pub hash: String,
}

/// Mapping from file path to content hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baseline {
    entries: BTreeMap<String, String>,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Insert or replace a path's hash. Returns the previous hash, if any.
    pub fn upsert(&mut self, path: impl Into<String>, hash: impl Into<String>) -> Option<String> {
        self.entries.insert(path.into(), hash.into())
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.entries.remove(path)
    }

    /// Tracked paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = BaselineEntry> + '_ {
        self.entries.iter().map(|(path, hash)| BaselineEntry {
            path: path.clone(),
            hash: hash.clone(),
        })
    }
}

impl FromIterator<BaselineEntry> for Baseline {
    fn from_iter<I: IntoIterator<Item = BaselineEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|e| (e.path, e.hash)).collect(),
        }
    }
}

// ============================================================================
// Scan results
// ============================================================================

/// Classification of one path in a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Unchanged,
    Modified { old: String, new: String },
    New { hash: String },
    /// Tracked path no longer present; carries the last known hash.
    Deleted { hash: String },
    /// Present but could not be hashed this pass. Baseline entry is left as-is.
    Unreadable { reason: String },
}

impl ScanOutcome {
    /// Level and message for the event this outcome emits. `None` for `Unchanged`.
    pub fn event(&self, path: &str) -> Option<(Level, String)> {
        match self {
            Self::Unchanged => None,
            Self::New { .. } => Some((Level::Warn, format!("New file detected: {}", path))),
            Self::Modified { .. } => Some((
                Level::Alert,
                format!("File integrity check failed for {}", path),
            )),
            Self::Deleted { .. } => Some((Level::Alert, format!("File deleted: {}", path))),
            Self::Unreadable { reason } => Some((Level::Error, reason.clone())),
        }
    }

    /// True for New, Modified and Deleted.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::New { .. } | Self::Modified { .. } | Self::Deleted { .. }
        )
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => write!(f, "UNCHANGED"),
            Self::Modified { .. } => write!(f, "MODIFIED"),
            Self::New { .. } => write!(f, "NEW"),
            Self::Deleted { .. } => write!(f, "DELETED"),
            Self::Unreadable { .. } => write!(f, "UNREADABLE"),
        }
    }
}

/// A single classified path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub path: String,
    pub outcome: ScanOutcome,
}

/// Ordered findings of one pass: observed files first, then deletions.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub findings: Vec<Finding>,
}

impl ScanReport {
    pub fn push(&mut self, path: impl Into<String>, outcome: ScanOutcome) {
        self.findings.push(Finding {
            path: path.into(),
            outcome,
        });
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, ScanOutcome::Unchanged))
    }

    pub fn modified(&self) -> usize {
        self.count(|o| matches!(o, ScanOutcome::Modified { .. }))
    }

    pub fn new_files(&self) -> usize {
        self.count(|o| matches!(o, ScanOutcome::New { .. }))
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, ScanOutcome::Deleted { .. }))
    }

    pub fn unreadable(&self) -> usize {
        self.count(|o| matches!(o, ScanOutcome::Unreadable { .. }))
    }

    /// Number of New + Modified + Deleted findings.
    pub fn changes(&self) -> usize {
        self.count(ScanOutcome::is_change)
    }

    pub fn outcome_for(&self, path: &str) -> Option<&ScanOutcome> {
        self.findings
            .iter()
            .find(|f| f.path == path)
            .map(|f| &f.outcome)
    }

    fn count(&self, pred: impl Fn(&ScanOutcome) -> bool) -> usize {
        self.findings.iter().filter(|f| pred(&f.outcome)).count()
    }
}

// ============================================================================
// Events
// ============================================================================

/// Severity of an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warn,
    Alert,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Alert => write!(f, "ALERT"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}
