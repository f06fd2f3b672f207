//! User/Kernel Memory Bridge
//!
//! The only way system call code reaches user memory. A bridge answers
//! whether a range is accessible and copies bytes across the boundary; it
//! never hands out references into user memory.
//!
//! # Security Principles
//! - Null, overflowing and out-of-window ranges are rejected
//! - Data is copied into kernel memory before use (no TOCTOU on contents)
//! - Copies report failure instead of faulting the kernel

use core::fmt;
use core::ptr;

use bitflags::bitflags;

use super::address::UserAddr;

bitflags! {
    /// Access rights on a user memory range.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Access: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
    }
}

/// A copy across the user/kernel boundary could not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFault {
    /// User address of the range being copied.
    pub addr: UserAddr,
    /// Length of the range in bytes.
    pub len: usize,
}

impl fmt::Display for CopyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user copy of {} bytes at {} faulted", self.len, self.addr)
    }
}

/// User-memory capability consumed by system calls.
pub trait UserMemory {
    /// Check that `addr..addr + len` is user memory the caller holds
    /// `access` rights on.
    fn access_ok(&self, addr: UserAddr, len: usize, access: Access) -> bool;

    /// Copy `dst.len()` bytes from user address `src` into `dst`.
    fn copy_from_user(&self, dst: &mut [u8], src: UserAddr) -> Result<(), CopyFault>;

    /// Copy `src` to user address `dst`.
    fn copy_to_user(&self, dst: UserAddr, src: &[u8]) -> Result<(), CopyFault>;
}

/// A flat user window that is mapped 1:1 into the kernel's view.
///
/// This is the bridge for kernels without per-process page tables: user
/// space is the fixed range `start..end`, readable and writable.
#[derive(Debug)]
pub struct DirectUserMemory {
    start: usize,
    end: usize,
}

impl DirectUserMemory {
    /// Create a bridge for the window `start..end`.
    ///
    /// # Safety
    /// Every byte of `start..end` must be mapped, readable and writable from
    /// the kernel for as long as the bridge is used.
    pub const unsafe fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// First address of the window.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// One past the last address of the window.
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Check a range lies inside the window.
    ///
    /// # Security Checks
    /// 1. Pointer is non-null
    /// 2. Pointer is within user space
    /// 3. Pointer + length doesn't overflow
    /// 4. End address is within user space
    fn contains(&self, addr: UserAddr, len: usize) -> bool {
        if addr.is_null() {
            return false;
        }
        let start = addr.as_usize();
        if start < self.start || start >= self.end {
            return false;
        }
        match addr.checked_add(len) {
            Some(end) => end.as_usize() <= self.end,
            None => false,
        }
    }
}

impl UserMemory for DirectUserMemory {
    fn access_ok(&self, addr: UserAddr, len: usize, access: Access) -> bool {
        (Access::READ | Access::WRITE).contains(access) && self.contains(addr, len)
    }

    fn copy_from_user(&self, dst: &mut [u8], src: UserAddr) -> Result<(), CopyFault> {
        if !self.contains(src, dst.len()) {
            return Err(CopyFault {
                addr: src,
                len: dst.len(),
            });
        }
        // SAFETY:
        // - Source range was checked against the mapped user window
        // - dst is a kernel slice and cannot overlap the user window
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr::<u8>(), dst.as_mut_ptr(), dst.len());
        }
        Ok(())
    }

    fn copy_to_user(&self, dst: UserAddr, src: &[u8]) -> Result<(), CopyFault> {
        if !self.contains(dst, src.len()) {
            return Err(CopyFault {
                addr: dst,
                len: src.len(),
            });
        }
        // SAFETY: As in copy_from_user, with the user range as destination
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), dst.as_mut_ptr::<u8>(), src.len());
        }
        Ok(())
    }
}
