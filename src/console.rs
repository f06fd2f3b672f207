//! Console Logger
//!
//! `log` backend that writes one line per record into any `fmt::Write`
//! console (a serial port, a framebuffer text buffer, a host string).
//!
//! # Output Format
//! `[LEVEL target] message`
//!
//! # Security Considerations
//! - Uses a spinlock so records from concurrent calls never interleave
//! - Write errors are dropped; logging cannot fail a caller

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

use crate::config::Config;

/// A `log::Log` implementation over a spin-locked writer.
pub struct ConsoleLogger<W> {
    out: Mutex<W>,
    level: LevelFilter,
}

impl<W: Write + Send> ConsoleLogger<W> {
    pub const fn new(out: W, level: LevelFilter) -> Self {
        Self {
            out: Mutex::new(out),
            level,
        }
    }

    /// Run `f` with exclusive access to the underlying writer.
    pub fn with_output<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        let mut out = self.out.lock();
        f(&mut *out)
    }

    fn write_record(out: &mut W, record: &Record) -> fmt::Result {
        writeln!(
            out,
            "[{:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl<W: Write + Send> Log for ConsoleLogger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut out = self.out.lock();
        let _ = Self::write_record(&mut *out, record);
    }

    fn flush(&self) {}
}

/// Install `logger` as the global `log` backend at the configured level.
pub fn init(logger: &'static dyn Log, config: &Config) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(config.log_level);
    log::info!("console logger installed (level {})", config.log_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use log::Level;

    fn record(logger: &ConsoleLogger<String>, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("memsort")
                .args(format_args!("{}", message))
                .build(),
        );
    }

    #[test]
    fn test_line_format() {
        let logger = ConsoleLogger::new(String::new(), LevelFilter::Trace);
        record(&logger, Level::Info, "starting");
        record(&logger, Level::Warn, "null pointer");

        logger.with_output(|out| {
            assert_eq!(
                out.as_str(),
                "[INFO  memsort] starting\n[WARN  memsort] null pointer\n"
            );
        });
    }

    #[test]
    fn test_level_filter() {
        let logger = ConsoleLogger::new(String::new(), LevelFilter::Warn);
        record(&logger, Level::Info, "dropped");
        record(&logger, Level::Warn, "kept");

        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
        logger.with_output(|out| assert_eq!(out.as_str(), "[WARN  memsort] kept\n"));
    }
}
