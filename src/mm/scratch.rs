//! Kernel Scratch Buffer
//!
//! A kernel-owned array of `i32` values that lives for exactly one system
//! call. The buffer is allocated after argument validation succeeds and
//! returned to its allocator when dropped, so every early return out of a
//! later stage releases it.
//!
//! # Security Properties
//! - Memory is zero-filled before it is exposed as a slice
//! - Contents are scrubbed before the block goes back to the heap
//! - Exactly one free per successful allocation

use core::alloc::Layout;
use core::mem::size_of;
use core::ptr::{self, NonNull};
use core::slice;

use super::allocator::KernelAllocator;
use crate::security::Zeroize;

/// An owned block of `len` values from a [`KernelAllocator`].
pub struct ScratchBuffer<'a, A: KernelAllocator + ?Sized> {
    ptr: NonNull<i32>,
    len: usize,
    layout: Layout,
    allocator: &'a A,
}

impl<'a, A: KernelAllocator + ?Sized> ScratchBuffer<'a, A> {
    /// Allocate room for `len` values.
    ///
    /// Returns `None` if `len` is zero, the byte size overflows, or the
    /// allocator is out of memory.
    pub fn allocate(allocator: &'a A, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let layout = Layout::array::<i32>(len).ok()?;
        let ptr = allocator.allocate(layout)?.cast::<i32>();

        // SAFETY: The block is at least `len` i32s and suitably aligned
        unsafe { ptr::write_bytes(ptr.as_ptr(), 0, len) };

        Some(Self {
            ptr,
            len,
            layout,
            allocator,
        })
    }

    /// Number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; empty buffers are never allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.len * size_of::<i32>()
    }

    pub fn as_slice(&self) -> &[i32] {
        // SAFETY: ptr is valid for len initialized i32s while self is alive
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        // SAFETY: As above, and &mut self guarantees exclusivity
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// View the values as raw bytes, the unit user copies work in.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: Any initialized i32 is also valid as 4 initialized bytes
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast::<u8>(), self.byte_len()) }
    }

    /// Mutable byte view; every byte pattern is a valid i32.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: As above; any byte pattern written back is a valid i32
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast::<u8>(), self.byte_len()) }
    }
}

impl<A: KernelAllocator + ?Sized> Drop for ScratchBuffer<'_, A> {
    fn drop(&mut self) {
        self.as_mut_slice().zeroize();
        // SAFETY: ptr/layout came from this allocator and drop runs once
        unsafe { self.allocator.free(self.ptr.cast::<u8>(), self.layout) };
    }
}
