//! FILENAME: app/src/logging.rs
// PURPOSE: Unified logging for the binary and the core crates.
// FORMAT: seq|level|category|message
//
// The core crates log through the `log` facade; `UnifiedLogger` turns those
// records into the same line format the `log_*!` macros write, using the
// record target as the category.

use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

/// Global sequence counter, one number per line written.
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Global log file handle. Lines always go to stderr; this is an extra copy.
pub static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

static LOGGER: UnifiedLogger = UnifiedLogger;

/// Environment variable holding the default log level.
pub const LOG_ENV_VAR: &str = "CANDLEVIEW_LOG";

pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

/// Single-letter level code used in the line format.
pub fn level_code(level: Level) -> &'static str {
    match level {
        Level::Error => "E",
        Level::Warn => "W",
        Level::Info => "I",
        Level::Debug => "D",
        Level::Trace => "T",
    }
}

fn level_from_code(code: &str) -> Level {
    match code {
        "E" => Level::Error,
        "W" => Level::Warn,
        "I" => Level::Info,
        "T" => Level::Trace,
        _ => Level::Debug,
    }
}

pub fn format_line(seq: u64, level: &str, category: &str, message: &str) -> String {
    format!("{}|{}|{}|{}", seq, level, category, message)
}

/// Installs the logger for the `log` facade and opens the log file, if any.
/// Can only install once per process; later calls just adjust the level.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<(), String> {
    if log::set_logger(&LOGGER).is_err() {
        eprintln!("[LOG_INIT] Logger already installed, updating level only");
    }
    log::set_max_level(level);

    if let Some(path) = log_file {
        init_log_file(path)?;
    }
    Ok(())
}

/// Opens (and truncates) the log file.
pub fn init_log_file(path: &Path) -> Result<(), String> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create log dir at {:?}: {}", dir, e))?;
        }
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| format!("Failed to create log file {:?}: {}", path, e))?;

    let mut log_file = LOG_FILE.lock().map_err(|e| format!("Lock error: {}", e))?;
    *log_file = Some(file);
    Ok(())
}

/// Writes a log line in the unified format, if `level` passes the filter.
pub fn write_log(level: &str, category: &str, message: &str) {
    if level_from_code(level) > log::max_level() {
        return;
    }
    let line = format_line(next_seq(), level, category, message);

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            if let Err(e) = writeln!(file, "{}", line) {
                eprintln!("[LOG_ERROR] Failed to write: {}", e);
            }
            let _ = file.flush();
        }
    }
    eprintln!("{}", line);
}

pub fn write_log_enter(level: &str, category: &str, func_name: &str, params: &str) {
    let message = if params.is_empty() {
        format!("ENTER {}", func_name)
    } else {
        format!("ENTER {} {}", func_name, params)
    };
    write_log(level, category, &message);
}

pub fn write_log_exit(level: &str, category: &str, func_name: &str, result: &str) {
    let message = if result.is_empty() {
        format!("EXIT {}", func_name)
    } else {
        format!("EXIT {} {}", func_name, result)
    };
    write_log(level, category, &message);
}

// ============================================================================
// LOG FACADE BRIDGE
// ============================================================================

struct UnifiedLogger;

impl log::Log for UnifiedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let category = record.target().to_uppercase();
        write_log(level_code(record.level()), &category, &record.args().to_string());
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                let _ = file.flush();
            }
        }
    }
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("D", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("I", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("W", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("E", $cat, &format!($($arg)*))
    };
}

// ENTER/EXIT macros for function tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_enter("D", $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_enter("D", $cat, $func, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_exit("D", $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_exit("D", $cat, $func, &format!($($arg)*))
    };
}

pub use log_debug;
pub use log_enter;
pub use log_error;
pub use log_exit;
pub use log_info;
pub use log_warn;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format() {
        assert_eq!(format_line(7, "I", "APP", "loaded 3 rows"), "7|I|APP|loaded 3 rows");
    }

    #[test]
    fn level_codes_round_trip() {
        for level in [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace] {
            assert_eq!(level_from_code(level_code(level)), level);
        }
    }

    #[test]
    fn lines_are_copied_to_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("candleview.log");
        init_log_file(&path).unwrap();
        if log::max_level() < LevelFilter::Error {
            log::set_max_level(LevelFilter::Error);
        }

        write_log("E", "TEST", "symbol fetch failed");

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.lines().any(|l| l.ends_with("|E|TEST|symbol fetch failed")));
    }

    #[test]
    fn sequence_increases() {
        let a = next_seq();
        let b = next_seq();
        assert!(b > a);
    }
}
