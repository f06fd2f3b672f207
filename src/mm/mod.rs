//! Memory management module
//!
//! Provides:
//! - Kernel heap allocation behind the `KernelAllocator` interface
//! - Call-scoped scratch buffers that free themselves
//! - The user/kernel memory bridge and user address type
//!
//! # Security Principles
//! - All allocations are bounds-checked and counted
//! - Kernel memory is initialized before use and scrubbed before release
//! - User memory is only reached through validated copies

mod address;
mod allocator;
mod scratch;
#[cfg(any(test, feature = "testing"))]
pub mod sim;
mod user;

pub use address::{UserAddr, PAGE_SIZE};
pub use allocator::{heap_size, init_heap, HeapStats, KernelAllocator, KernelHeap, KERNEL_HEAP};
pub use scratch::ScratchBuffer;
pub use user::{Access, CopyFault, DirectUserMemory, UserMemory};

#[cfg(test)]
pub(crate) use allocator::tests::test_heap;
