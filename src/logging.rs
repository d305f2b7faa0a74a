//! Minimal stderr backend for the `log` facade.

use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};

/// Logger printing timestamped, thread-tagged lines to stderr.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

/// Install the global logger at the default `Info` ceiling.
pub fn init() {
    init_with_level(LevelFilter::Info);
}

/// Install the global logger with an explicit level ceiling. Safe to call
/// more than once; later calls are ignored.
pub fn init_with_level(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

impl Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let current = thread::current();
        let thread_name = current.name().unwrap_or("unnamed");
        eprintln!(
            "[{ts}ms][{thread_name}][{}] {}",
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {}
}
