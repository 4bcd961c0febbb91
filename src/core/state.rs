//! FIM-003: Baseline store — load, save (atomic).

use super::error::{IntegrityError, Result};
use super::types::{Baseline, BaselineEntry};
use crate::tripwire::hasher;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Durable path → digest mapping backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the baseline. A missing file is an empty baseline.
    pub fn load(&self) -> Result<Baseline> {
        let bytes = match std::fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no baseline yet, starting empty");
                return Ok(Baseline::new());
            }
            Err(source) => {
                return Err(IntegrityError::BaselineRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let baseline = std::str::from_utf8(&bytes)
            .map_err(|e| format!("not UTF-8 text: {}", e))
            .and_then(parse_baseline)
            .map_err(|reason| IntegrityError::CorruptState {
                path: self.path.clone(),
                reason,
            })?;
        tracing::debug!(path = %self.path.display(), entries = baseline.len(), "baseline loaded");
        Ok(baseline)
    }

    /// Save the baseline atomically (write to temp, then rename).
    pub fn save(&self, baseline: &Baseline) -> Result<()> {
        let write_err = |source| IntegrityError::BaselineWrite {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let json = render_baseline(baseline)?;

        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, &json).map_err(write_err)?;
        if let Err(source) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(write_err(source));
        }
        tracing::debug!(path = %self.path.display(), entries = baseline.len(), "baseline saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Parse and validate the persisted representation.
pub fn parse_baseline(content: &str) -> std::result::Result<Baseline, String> {
    let raw: BTreeMap<String, String> =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {}", e))?;
    for (path, hash) in &raw {
        if !hasher::is_digest(hash) {
            return Err(format!("entry '{}' has malformed digest '{}'", path, hash));
        }
    }
    Ok(raw
        .into_iter()
        .map(|(path, hash)| BaselineEntry { path, hash })
        .collect())
}

/// Canonical on-disk form: 2-space pretty JSON, sorted keys, trailing newline.
pub fn render_baseline(baseline: &Baseline) -> Result<String> {
    let mut json = serde_json::to_string_pretty(baseline)?;
    json.push('\n');
    Ok(json)
}
