//! User-Space Address Type
//!
//! Type-safe wrapper for addresses handed to the kernel by user code.
//!
//! # Security Properties
//! - A user address cannot be dereferenced without an explicit unsafe call
//! - Arithmetic on user addresses is overflow-checked
//! - Null is a first-class, checkable state

use core::fmt;

/// Page size (4 KiB)
pub const PAGE_SIZE: usize = 4096;
/// Page size mask
pub const PAGE_MASK: usize = PAGE_SIZE - 1;

/// An address in the calling process's address space.
///
/// The kernel never reads or writes through a `UserAddr` directly; it is
/// handed to a [`UserMemory`](super::UserMemory) bridge which checks and
/// copies.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct UserAddr(usize);

impl UserAddr {
    /// Create a user address from a raw value.
    #[inline]
    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    /// The null user address.
    #[inline]
    pub const fn null() -> Self {
        Self(0)
    }

    /// Decode a user address from a syscall argument register.
    #[inline]
    pub const fn from_register(reg: u64) -> Self {
        Self(reg as usize)
    }

    /// Get the raw address value.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Check if this is the null address.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Add a byte offset, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, offset: usize) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(addr) => Some(Self(addr)),
            None => None,
        }
    }

    /// Byte offset of this address from `base`, or `None` if it lies below.
    #[inline]
    pub const fn offset_from(self, base: Self) -> Option<usize> {
        self.0.checked_sub(base.0)
    }

    /// Check if the address is page-aligned.
    #[inline]
    pub const fn is_page_aligned(self) -> bool {
        self.0 & PAGE_MASK == 0
    }

    /// Convert to a raw pointer.
    ///
    /// # Safety
    /// The caller must ensure the address is mapped and readable from the
    /// current context.
    #[inline]
    pub const unsafe fn as_ptr<T>(self) -> *const T {
        self.0 as *const T
    }

    /// Convert to a mutable raw pointer.
    ///
    /// # Safety
    /// The caller must ensure the address is mapped and writable from the
    /// current context.
    #[inline]
    pub const unsafe fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }
}

impl fmt::Debug for UserAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserAddr({:#018x})", self.0)
    }
}

impl fmt::Display for UserAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
