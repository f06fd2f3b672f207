//! Secure Memory Zeroization
//!
//! Kernel scratch memory holds data copied out of a user process. It is
//! scrubbed before being handed back to the heap so the next allocation can
//! never observe another caller's values.
//!
//! # Design
//! - `Zeroize` trait for buffers that can be securely cleared
//! - Volatile writes prevent compiler optimization of zeroing

use core::ptr;
use core::sync::atomic::{compiler_fence, Ordering};

/// Trait for types that can be securely zeroed.
///
/// Implementations must ensure that all data is overwritten with zeros in a
/// way that cannot be optimized away.
pub trait Zeroize {
    /// Overwrite this value with zeros.
    fn zeroize(&mut self);
}

impl Zeroize for [u8] {
    fn zeroize(&mut self) {
        for byte in self.iter_mut() {
            // SAFETY: `byte` is a valid, aligned, exclusive reference
            unsafe { ptr::write_volatile(byte, 0) };
        }
        compiler_fence(Ordering::SeqCst);
    }
}

impl Zeroize for [i32] {
    fn zeroize(&mut self) {
        for value in self.iter_mut() {
            // SAFETY: `value` is a valid, aligned, exclusive reference
            unsafe { ptr::write_volatile(value, 0) };
        }
        compiler_fence(Ordering::SeqCst);
    }
}
