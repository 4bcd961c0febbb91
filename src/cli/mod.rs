//! FIM-008: Command entry — wire config, event sink, store and comparator.

use crate::core::config::{self, Config};
use crate::core::error::Result;
use crate::core::state::BaselineStore;
use crate::core::types::{Level, ScanReport};
use crate::tripwire::comparator::Comparator;
use crate::tripwire::eventlog::{EventSink, LogSink};
use std::path::Path;

/// Confirmation emitted after a successful pass.
pub const COMPLETED_MESSAGE: &str = "File integrity check completed successfully.";

/// Load `fimcheck.yaml` from `dir` (defaults when absent) and run one pass.
pub fn dispatch(dir: &Path, verbose: bool) -> Result<ScanReport> {
    let config = config::load_config(&dir.join(config::CONFIG_FILE))?;
    run(&config, verbose)
}

/// Open the log sink and run one pass with it.
pub fn run(config: &Config, verbose: bool) -> Result<ScanReport> {
    let sink = LogSink::open(&config.log_file, verbose)?;
    execute(config, &sink)
}

/// One reconciliation pass against `sink`. Fatal errors are logged as ERROR
/// and returned; the completion message is only emitted on success.
pub fn execute(config: &Config, sink: &dyn EventSink) -> Result<ScanReport> {
    let store = BaselineStore::new(&config.baseline);
    let comparator = Comparator::new(&config.watch_dir, &store, sink);
    match comparator.scan() {
        Ok(report) => {
            sink.emit(Level::Info, COMPLETED_MESSAGE);
            Ok(report)
        }
        Err(e) => {
            sink.emit(Level::Error, &e.to_string());
            Err(e)
        }
    }
}
