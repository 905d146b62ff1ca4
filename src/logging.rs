//! Logger installation for the binaries.
//!
//! Stderr gets warnings and errors, or everything down to `Debug` in verbose
//! mode; a log file, when named, receives `Info` and above. Stdout stays
//! reserved for the UCI protocol.

use log::{LevelFilter, Log, Metadata, Record};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

static HAS_LOG_FILE: AtomicBool = AtomicBool::new(false);
static VERBOSE: AtomicBool = AtomicBool::new(false);

fn stderr_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Global level: the most detailed of the installed sinks
fn max_level(verbose: bool, has_log_file: bool) -> LevelFilter {
    if has_log_file {
        stderr_level(verbose).max(LevelFilter::Info)
    } else {
        stderr_level(verbose)
    }
}

/// Stderr sink whose level follows `set_verbose`
struct StderrLogger {
    inner: Box<TermLogger>,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= stderr_level(VERBOSE.load(Ordering::Relaxed)) && self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

impl SharedLogger for StderrLogger {
    fn level(&self) -> LevelFilter {
        self.inner.level()
    }

    fn config(&self) -> Option<&Config> {
        self.inner.config()
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}

/// Install the loggers. Failures are reported on stderr and ignored.
pub fn init(verbose: bool, log_file: Option<&Path>) {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![Box::new(StderrLogger {
        inner: TermLogger::new(LevelFilter::Debug, config.clone(), TerminalMode::Stderr, ColorChoice::Never),
    })];

    if let Some(path) = log_file {
        match File::create(path) {
            Ok(file) => {
                loggers.push(WriteLogger::new(LevelFilter::Info, config, file));
                HAS_LOG_FILE.store(true, Ordering::Relaxed);
            }
            Err(e) => eprintln!("cannot create log file {}: {}", path.display(), e),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("logger initialization failed: {}", e);
        return;
    }
    set_verbose(verbose);
    log::info!("logger initialized");
}

/// Switch debug output on or off at run time.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
    log::set_max_level(max_level(verbose, HAS_LOG_FILE.load(Ordering::Relaxed)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_level() {
        assert_eq!(max_level(true, false), LevelFilter::Debug);
        assert_eq!(max_level(true, true), LevelFilter::Debug);
        assert_eq!(max_level(false, false), LevelFilter::Warn);
    }

    #[test]
    fn log_file_does_not_widen_stderr() {
        assert_eq!(max_level(false, true), LevelFilter::Info);
        assert_eq!(stderr_level(false), LevelFilter::Warn);
        assert_eq!(stderr_level(true), LevelFilter::Debug);
    }
}
