//! Memory Sorter
//!
//! Copies a user buffer of `i32` values into kernel memory, sorts it from
//! largest to smallest and copies the result into a second user buffer.
//!
//! # Pipeline
//! ```text
//! validate -> transfer in -> sort -> report -> transfer out
//!              (allocate)                      (free)
//! ```
//! The scratch buffer is a [`ScratchBuffer`], so every failure after the
//! allocation releases it on the way out. `transfer_out` takes it by value
//! and frees it before returning, whatever the copy result.

use core::fmt;

use super::handler::SyscallError;
use super::validate::{validate_request, Request, ValidatedRequest};
use crate::config::Config;
use crate::diag::DiagnosticSink;
use crate::mm::{KernelAllocator, ScratchBuffer, UserMemory};
use crate::sort::{is_descending, sort_descending};

/// Why a memsort call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemsortError {
    /// Source or destination pointer is null.
    NullArgument,
    /// Count is zero or negative.
    InvalidSize,
    /// A buffer is not writable user memory of the required size.
    AddressSpaceViolation,
    /// The kernel allocator could not provide the scratch buffer.
    AllocationFailure,
    /// A copy across the user/kernel boundary did not complete.
    CopyFault,
}

impl MemsortError {
    /// Error code returned to user space.
    pub const fn errno(self) -> SyscallError {
        match self {
            MemsortError::NullArgument
            | MemsortError::AddressSpaceViolation
            | MemsortError::CopyFault => SyscallError::Efault,
            MemsortError::InvalidSize => SyscallError::Einval,
            MemsortError::AllocationFailure => SyscallError::Enomem,
        }
    }
}

impl fmt::Display for MemsortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            MemsortError::NullArgument => "null pointer argument",
            MemsortError::InvalidSize => "size is not positive",
            MemsortError::AddressSpaceViolation => "buffer is not in user space",
            MemsortError::AllocationFailure => "kernel allocation failed",
            MemsortError::CopyFault => "user copy faulted",
        };
        f.write_str(message)
    }
}

/// Services a system call runs against.
pub struct SyscallEnv<'a, U: ?Sized, A: ?Sized, D: ?Sized> {
    pub user: &'a U,
    pub heap: &'a A,
    pub diag: &'a D,
    pub config: &'a Config,
}

impl<'a, U: ?Sized, A: ?Sized, D: ?Sized> SyscallEnv<'a, U, A, D> {
    pub const fn new(user: &'a U, heap: &'a A, diag: &'a D, config: &'a Config) -> Self {
        Self {
            user,
            heap,
            diag,
            config,
        }
    }
}

/// Sort `request.count` values from `request.source` into
/// `request.destination`, largest first.
pub fn memsort<U, A, D>(env: &SyscallEnv<'_, U, A, D>, request: Request) -> Result<(), MemsortError>
where
    U: UserMemory + ?Sized,
    A: KernelAllocator + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    env.diag.info(format_args!("call starting\n"));

    let request = validate_request(env.user, env.diag, &request)?;
    env.diag
        .info(format_args!("buffer is {} bytes\n", request.byte_len()));

    let mut scratch = transfer_in(env, &request)?;

    sort_descending(scratch.as_mut_slice());
    debug_assert!(is_descending(scratch.as_slice()));
    report_sorted(env.diag, scratch.as_slice(), env.config.report_limit);

    transfer_out(env, &request, scratch)?;

    env.diag.info(format_args!("completed\n"));
    Ok(())
}

/// Allocate the scratch buffer and fill it from the source buffer.
fn transfer_in<'a, U, A, D>(
    env: &SyscallEnv<'a, U, A, D>,
    request: &ValidatedRequest,
) -> Result<ScratchBuffer<'a, A>, MemsortError>
where
    U: UserMemory + ?Sized,
    A: KernelAllocator + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    let mut scratch = match ScratchBuffer::allocate(env.heap, request.count()) {
        Some(scratch) => scratch,
        None => {
            env.diag.warn(format_args!(
                "failed to allocate {} bytes\n",
                request.byte_len()
            ));
            return Err(MemsortError::AllocationFailure);
        }
    };

    if let Err(fault) = env
        .user
        .copy_from_user(scratch.as_bytes_mut(), request.source())
    {
        env.diag
            .warn(format_args!("failed to copy from user space: {}\n", fault));
        return Err(MemsortError::CopyFault);
    }

    Ok(scratch)
}

/// Copy the sorted values to the destination buffer and release them.
fn transfer_out<U, A, D>(
    env: &SyscallEnv<'_, U, A, D>,
    request: &ValidatedRequest,
    scratch: ScratchBuffer<'_, A>,
) -> Result<(), MemsortError>
where
    U: UserMemory + ?Sized,
    A: KernelAllocator + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    let copied = env
        .user
        .copy_to_user(request.destination(), scratch.as_bytes());
    drop(scratch);

    copied.map_err(|fault| {
        env.diag
            .warn(format_args!("failed to copy to user space: {}\n", fault));
        MemsortError::CopyFault
    })
}

/// One record listing at most `limit` sorted values.
fn report_sorted<D: DiagnosticSink + ?Sized>(diag: &D, values: &[i32], limit: usize) {
    diag.info(format_args!("sorted numbers:"));
    for value in values.iter().take(limit) {
        diag.cont(format_args!(" {}", value));
    }
    if values.len() > limit {
        diag.cont(format_args!(" ... ({} more)", values.len() - limit));
    }
    diag.cont(format_args!(".\n"));
}
