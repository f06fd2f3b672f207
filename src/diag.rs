//! Diagnostics Side Channel
//!
//! System calls report stage transitions to a [`DiagnosticSink`]. The sink
//! is handed in by the caller and its behavior never feeds back into the
//! call: emitting cannot fail and nothing branches on it.
//!
//! Records follow kernel log semantics. A record ends at a trailing newline.
//! A [`Severity::Continuation`] fragment extends the open record; any other
//! severity closes it and starts a new one.

use alloc::string::String;
use core::fmt::{self, Write};

use log::Level;
use spin::Mutex;

/// Severity of a diagnostic fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    /// Appends to the currently open record.
    Continuation,
}

impl Severity {
    /// `log` level a record opened at this severity is forwarded at.
    pub const fn level(self) -> Level {
        match self {
            Severity::Warning => Level::Warn,
            Severity::Info | Severity::Continuation => Level::Info,
        }
    }
}

/// A leveled message sink.
pub trait DiagnosticSink {
    /// Emit one formatted fragment.
    fn emit(&self, severity: Severity, args: fmt::Arguments<'_>);

    #[inline]
    fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Info, args);
    }

    #[inline]
    fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Warning, args);
    }

    #[inline]
    fn cont(&self, args: fmt::Arguments<'_>) {
        self.emit(Severity::Continuation, args);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    #[inline]
    fn emit(&self, _severity: Severity, _args: fmt::Arguments<'_>) {}
}

/// Default `log` target for system call diagnostics.
pub const DEFAULT_TARGET: &str = "memsort";

/// Assembles records and forwards each completed one to the `log` facade.
pub struct LogSink {
    target: &'static str,
    open: Mutex<Option<(Level, String)>>,
}

impl LogSink {
    pub const fn new(target: &'static str) -> Self {
        Self {
            target,
            open: Mutex::new(None),
        }
    }

    pub const fn target(&self) -> &'static str {
        self.target
    }

    fn forward(&self, level: Level, text: &str) {
        log::log!(target: self.target, level, "{}", text.trim_end_matches('\n'));
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

impl DiagnosticSink for LogSink {
    fn emit(&self, severity: Severity, args: fmt::Arguments<'_>) {
        let mut open = self.open.lock();

        if severity != Severity::Continuation {
            if let Some((level, text)) = open.take() {
                self.forward(level, &text);
            }
        }

        let (_, text) = open.get_or_insert_with(|| (severity.level(), String::new()));
        let _ = text.write_fmt(args);

        if text.ends_with('\n') {
            if let Some((level, text)) = open.take() {
                self.forward(level, &text);
            }
        }
    }
}
