//! FIM-007: Run configuration — defaults plus optional `fimcheck.yaml` override.
//!
//! Every key is optional; unknown keys are rejected so typos surface early.

use super::error::{IntegrityError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "fimcheck.yaml";

pub const DEFAULT_WATCH_DIR: &str = "sample_dir";
pub const DEFAULT_BASELINE: &str = "file_integrity_db.json";
pub const DEFAULT_LOG_FILE: &str = "integrity_check.log";

/// Where to scan, where the baseline lives, where events go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory whose immediate files are monitored
    #[serde(default = "default_watch_dir")]
    pub watch_dir: PathBuf,

    /// Persisted path → digest mapping
    #[serde(default = "default_baseline")]
    pub baseline: PathBuf,

    /// Append-only event log
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_watch_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WATCH_DIR)
}

fn default_baseline() -> PathBuf {
    PathBuf::from(DEFAULT_BASELINE)
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_dir: default_watch_dir(),
            baseline: default_baseline(),
            log_file: default_log_file(),
        }
    }
}

/// Load config from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(IntegrityError::Config {
                path: path.to_path_buf(),
                reason: format!("cannot read: {}", e),
            })
        }
    };
    let config = parse_config(&content).map_err(|reason| IntegrityError::Config {
        path: path.to_path_buf(),
        reason,
    })?;
    let errors = validate_config(&config);
    if !errors.is_empty() {
        return Err(IntegrityError::Config {
            path: path.to_path_buf(),
            reason: errors.join("; "),
        });
    }
    Ok(config)
}

/// Parse YAML text. An empty document is the default config.
pub fn parse_config(yaml: &str) -> std::result::Result<Config, String> {
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml_ng::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

/// Validate a parsed config. Returns a list of errors (empty = valid).
pub fn validate_config(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();
    for (name, value) in [
        ("watch_dir", &config.watch_dir),
        ("baseline", &config.baseline),
        ("log_file", &config.log_file),
    ] {
        if value.as_os_str().is_empty() {
            errors.push(format!("{} must not be empty", name));
        }
    }
    if config.baseline == config.log_file {
        errors.push("baseline and log_file must be different files".to_string());
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fim007_defaults() {
        let c = Config::default();
        assert_eq!(c.watch_dir, PathBuf::from("sample_dir"));
        assert_eq!(c.baseline, PathBuf::from("file_integrity_db.json"));
        assert_eq!(c.log_file, PathBuf::from("integrity_check.log"));
        assert!(validate_config(&c).is_empty());
    }

    #[test]
    fn test_fim007_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let c = load_config(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn test_fim007_partial_override() {
        let c = parse_config("watch_dir: /srv/www\n").unwrap();
        assert_eq!(c.watch_dir, PathBuf::from("/srv/www"));
        assert_eq!(c.baseline, PathBuf::from(DEFAULT_BASELINE));
    }

    #[test]
    fn test_fim007_empty_document() {
        assert_eq!(parse_config("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_fim007_unknown_key_rejected() {
        let err = parse_config("watchdir: oops\n").unwrap_err();
        assert!(err.contains("YAML parse error"));
    }

    #[test]
    fn test_fim007_same_baseline_and_log_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "baseline: state.txt\nlog_file: state.txt\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, IntegrityError::Config { .. }));
        assert!(err.to_string().contains("must be different"));
    }

    #[test]
    fn test_fim007_empty_path_rejected() {
        let c = Config {
            watch_dir: PathBuf::new(),
            ..Config::default()
        };
        let errors = validate_config(&c);
        assert_eq!(errors, vec!["watch_dir must not be empty".to_string()]);
    }
}
