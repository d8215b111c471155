use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// Keep lines until [`drain`] collects them (the dashboard console).
    Buffer,
    Stderr,
}

struct ConsoleLogger {
    sink: Sink,
}

static LOGGER: OnceCell<ConsoleLogger> = OnceCell::new();
static BUFFER: Mutex<Vec<String>> = Mutex::new(Vec::new());

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), &record.args().to_string());
        match self.sink {
            Sink::Stderr => eprintln!("{line}"),
            Sink::Buffer => {
                if let Ok(mut buf) = BUFFER.lock() {
                    buf.push(line);
                }
            }
        }
    }

    fn flush(&self) {}
}

/// `[INFO] ...` style line, matching the console panel.
pub fn format_line(level: Level, msg: &str) -> String {
    let tag = match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        _ => "INFO",
    };
    format!("[{tag}] {msg}")
}

/// Installs the process logger once; later calls are ignored.
pub fn init(sink: Sink) {
    let logger = LOGGER.get_or_init(|| ConsoleLogger { sink });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

/// Takes every buffered line logged since the previous call.
pub fn drain() -> Vec<String> {
    match BUFFER.lock() {
        Ok(mut buf) => std::mem::take(&mut *buf),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_carry_level_tag() {
        assert_eq!(format_line(Level::Info, "loaded"), "[INFO] loaded");
        assert_eq!(format_line(Level::Warn, "fallback"), "[WARN] fallback");
        assert_eq!(format_line(Level::Debug, "x"), "[INFO] x");
    }
}
