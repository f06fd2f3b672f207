//! System Call Interface
//!
//! Provides the memsort system call for user-mode applications.
//!
//! # Security Model
//! - Whitelist approach: only explicitly implemented syscalls are allowed
//! - All parameters are validated before any kernel memory is touched
//! - User memory is reached only through the `UserMemory` bridge
//! - Invalid inputs return errors, never panic
//!
//! # Current Syscalls
//! - 333: memsort(buf, size, sbuf) - sort `size` i32s from `buf` into `sbuf`,
//!   largest first

mod handler;
mod memsort;
mod validate;

pub use handler::{dispatch, numbers, sys_memsort, SyscallError};
pub use memsort::{memsort, MemsortError, SyscallEnv};
pub use validate::{validate_request, Request, ValidatedRequest};
