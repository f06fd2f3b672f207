//! System Call Handler
//!
//! Dispatches system calls and implements the typed memsort entry point.
//!
//! # Security Considerations
//! - All syscall numbers are validated against the whitelist
//! - Unknown syscalls return ENOSYS
//! - Parameters are validated before use

use super::memsort::{memsort, MemsortError, SyscallEnv};
use super::validate::Request;
use crate::diag::DiagnosticSink;
use crate::mm::{KernelAllocator, UserAddr, UserMemory};

/// System call numbers
pub mod numbers {
    pub const SYS_MEMSORT: usize = 333;
}

/// System call error codes
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallError {
    /// Out of kernel memory
    Enomem = -12,
    /// Bad address (invalid pointer)
    Efault = -14,
    /// Invalid argument
    Einval = -22,
    /// Invalid system call number
    Enosys = -38,
}

impl From<MemsortError> for SyscallError {
    fn from(err: MemsortError) -> Self {
        err.errno()
    }
}

/// Dispatch a system call
///
/// # Arguments
/// * `syscall_num` - System call number
/// * `args` - Argument registers, first argument at index 0
/// * `env` - Services the call runs against
///
/// # Returns
/// Result value for the return register
pub fn dispatch<U, A, D>(syscall_num: usize, args: &[u64; 6], env: &SyscallEnv<'_, U, A, D>) -> i64
where
    U: UserMemory + ?Sized,
    A: KernelAllocator + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    match syscall_num {
        numbers::SYS_MEMSORT => sys_memsort(
            env,
            UserAddr::from_register(args[0]), // buf
            args[1] as i32,                   // size, in elements
            UserAddr::from_register(args[2]), // sbuf
        ),
        _ => {
            env.diag
                .warn(format_args!("unknown syscall {}\n", syscall_num));
            SyscallError::Enosys as i64
        }
    }
}

/// Memory sorter system call
///
/// Sorts `size` values at `buf` from largest to smallest and stores them at
/// `sbuf`.
///
/// # Returns
/// 0 on success, negative error code on failure
///
/// # Security
/// - Both pointers must be non-null, writable user memory
/// - `size` must be positive
/// - Kernel scratch memory is scrubbed and freed on every path
pub fn sys_memsort<U, A, D>(
    env: &SyscallEnv<'_, U, A, D>,
    buf: UserAddr,
    size: i32,
    sbuf: UserAddr,
) -> i64
where
    U: UserMemory + ?Sized,
    A: KernelAllocator + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    let request = Request {
        source: buf,
        count: size,
        destination: sbuf,
    };
    match memsort(env, request) {
        Ok(()) => 0,
        Err(err) => SyscallError::from(err) as i64,
    }
}
