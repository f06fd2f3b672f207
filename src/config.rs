//! Kernel Configuration
//!
//! Compile-time defaults for the user window, log verbosity and the size of
//! the sorted-result report. Hosts start from [`Config::DEFAULT`] and
//! override with the builder methods.

use log::LevelFilter;

use crate::mm::DirectUserMemory;

/// User-space memory regions
///
/// In a real system, these would be per-process and managed by the VMM.
pub mod regions {
    /// Start of user-accessible memory
    pub const USER_START: usize = 0x4000_0000;
    /// End of user-accessible memory (kernel image starts here)
    pub const USER_END: usize = 0x4008_0000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// First byte of user-accessible memory.
    pub user_start: usize,
    /// One past the last byte of user-accessible memory.
    pub user_end: usize,
    /// Maximum level the console logger records.
    pub log_level: LevelFilter,
    /// Values printed in the sorted-result report before it is elided.
    pub report_limit: usize,
}

impl Config {
    pub const DEFAULT: Config = Config {
        user_start: regions::USER_START,
        user_end: regions::USER_END,
        log_level: LevelFilter::Info,
        report_limit: 64,
    };

    pub const fn with_user_region(mut self, start: usize, end: usize) -> Self {
        self.user_start = start;
        self.user_end = end;
        self
    }

    pub const fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    pub const fn with_report_limit(mut self, limit: usize) -> Self {
        self.report_limit = limit;
        self
    }

    /// Bridge over the configured user window.
    ///
    /// # Safety
    /// The configured window must be mapped, readable and writable from the
    /// kernel, as required by [`DirectUserMemory::new`].
    pub const unsafe fn user_memory(&self) -> DirectUserMemory {
        // SAFETY: Forwarded to the caller
        unsafe { DirectUserMemory::new(self.user_start, self.user_end) }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
