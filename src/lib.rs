//! memsort - Descending-Sort System Call
//!
//! A kernel-side entry point that copies a user buffer of `i32` values into
//! kernel memory, sorts it from largest to smallest and copies the result
//! into a second user buffer.
//!
//! # Security Features
//! - Every argument is validated before kernel memory is touched
//! - User memory is only reached through an injected copy bridge
//! - Kernel scratch memory is owned, scrubbed and freed on every path
//! - Diagnostics are a side channel that cannot alter a call's result
//!
//! # Layout
//! - `syscall`: validation, the sort pipeline and dispatch
//! - `mm`: kernel heap, scratch buffers, user memory bridge
//! - `diag` / `console`: diagnostic sinks and the `log` backend
//! - `config`: user window, log level and report defaults

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod config;
pub mod console;
pub mod diag;
pub mod mm;
pub mod security;
pub mod sort;
pub mod syscall;

pub use config::Config;
pub use diag::{DiagnosticSink, LogSink, NullSink, Severity};
pub use mm::{KernelAllocator, KernelHeap, UserAddr, UserMemory};
pub use syscall::{dispatch, memsort, sys_memsort, MemsortError, Request, SyscallEnv, SyscallError};
