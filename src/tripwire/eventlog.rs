//! FIM-005: Leveled event sinks — append-only log file, optional console mirror.

use crate::core::error::{IntegrityError, Result};
use crate::core::types::Level;
use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Destination for classification and error events.
pub trait EventSink {
    fn emit(&self, level: Level, message: &str);
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn now_iso8601() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// One log line: `<ts> <LEVEL>: <message>\n`.
pub fn format_line(ts: &str, level: Level, message: &str) -> String {
    format!("{} {}: {}\n", ts, level, message)
}

/// Appends events to a log file and optionally mirrors them to a console writer.
pub struct LogSink {
    file: File,
    console: Option<RefCell<Box<dyn Write>>>,
}

impl LogSink {
    /// Open (or create) the log file in append mode. Verbose mirrors to stdout.
    pub fn open(path: &Path, verbose: bool) -> Result<Self> {
        let open_err = |source| IntegrityError::LogOpen {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(open_err)?;
            }
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_err)?;
        let sink = Self {
            file,
            console: None,
        };
        Ok(if verbose {
            sink.with_console(std::io::stdout())
        } else {
            sink
        })
    }

    /// Mirror every event to `writer` as well.
    pub fn with_console(mut self, writer: impl Write + 'static) -> Self {
        self.console = Some(RefCell::new(Box::new(writer)));
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.console.is_some()
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink")
            .field("file", &self.file)
            .field("verbose", &self.is_verbose())
            .finish()
    }
}

impl EventSink for LogSink {
    fn emit(&self, level: Level, message: &str) {
        let line = format_line(&now_iso8601(), level, message);
        if let Err(e) = (&self.file).write_all(line.as_bytes()) {
            tracing::warn!(error = %e, "failed to write event to log file");
        }
        if let Some(console) = &self.console {
            let mut out = console.borrow_mut();
            if let Err(e) = out.write_all(line.as_bytes()).and_then(|()| out.flush()) {
                tracing::warn!(error = %e, "failed to mirror event to console");
            }
        }
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<(Level, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(Level, String)> {
        self.events.borrow().clone()
    }

    pub fn count(&self, level: Level) -> usize {
        self.events.borrow().iter().filter(|(l, _)| *l == level).count()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, level: Level, message: &str) {
        self.events.borrow_mut().push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    /// Console stand-in that can be read back after the sink owns it.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Console that always fails, like stdout with a closed pipe.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fim005_now_iso8601() {
        let ts = now_iso8601();
        assert_eq!(ts.len(), 20);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%dT%H:%M:%SZ").is_ok());
    }

    #[test]
    fn test_fim005_format_line() {
        assert_eq!(
            format_line("2026-01-01T00:00:00Z", Level::Alert, "File deleted: d/a.txt"),
            "2026-01-01T00:00:00Z ALERT: File deleted: d/a.txt\n"
        );
    }

    #[test]
    fn test_fim005_log_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("integrity_check.log");
        std::fs::write(&path, "previous run\n").unwrap();

        let sink = LogSink::open(&path, false).unwrap();
        assert!(!sink.is_verbose());
        sink.emit(Level::Warn, "New file detected: d/a.txt");
        sink.emit(Level::Info, "done");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "previous run");
        assert!(lines[1].ends_with("WARN: New file detected: d/a.txt"));
        assert!(lines[2].ends_with("INFO: done"));
    }

    #[test]
    fn test_fim005_verbose_open_mirrors() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::open(&dir.path().join("x.log"), true).unwrap();
        assert!(sink.is_verbose());
    }

    #[test]
    fn test_fim005_console_gets_same_lines_as_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("integrity_check.log");
        let console = SharedBuf::default();

        let sink = LogSink::open(&path, false)
            .unwrap()
            .with_console(console.clone());
        sink.emit(Level::Alert, "File deleted: d/a.txt");
        sink.emit(Level::Info, "done");

        let mirrored = String::from_utf8(console.0.borrow().clone()).unwrap();
        let file = std::fs::read_to_string(&path).unwrap();
        assert_eq!(mirrored, file);
        assert!(mirrored.contains("ALERT: File deleted: d/a.txt\n"));
    }

    #[test]
    fn test_fim005_console_failure_does_not_stop_file_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("integrity_check.log");
        let sink = LogSink::open(&path, false).unwrap().with_console(BrokenPipe);
        sink.emit(Level::Warn, "one");
        sink.emit(Level::Warn, "two");
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_fim005_log_sink_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let err = LogSink::open(&blocker.join("x.log"), false).unwrap_err();
        assert!(matches!(err, IntegrityError::LogOpen { .. }));
    }

    #[test]
    fn test_fim005_recording_sink() {
        let sink = RecordingSink::new();
        assert!(sink.is_empty());
        sink.emit(Level::Alert, "a");
        sink.emit(Level::Alert, "b");
        sink.emit(Level::Warn, "c");
        assert_eq!(sink.count(Level::Alert), 2);
        assert_eq!(sink.count(Level::Error), 0);
        assert_eq!(sink.events()[2], (Level::Warn, "c".to_string()));
    }
}
