//! Kernel Heap Allocator
//!
//! Uses `linked_list_allocator` for heap management.
//!
//! The system call core never touches the global allocator. It asks a
//! [`KernelAllocator`] for memory, which keeps the allocate/free pairing
//! observable and lets tests run every call against its own heap.
//!
//! # Security Considerations
//! - Heap regions are initialized exactly once
//! - Allocation failure is reported, never turned into a null buffer
//! - Every allocation and free is counted so leaks are detectable

use core::alloc::Layout;
use core::ptr::{addr_of_mut, NonNull};
use core::sync::atomic::{AtomicUsize, Ordering};

use linked_list_allocator::Heap;
use spin::{Mutex, Once};

/// Kernel memory allocator interface consumed by system calls.
///
/// Implementations must be safe under concurrent allocate/free from several
/// simultaneous calls.
pub trait KernelAllocator {
    /// Allocate a block for `layout`, or `None` if the request cannot be met.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Return a block to the allocator.
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate` on this allocator with the
    /// same `layout`, and must not be freed twice.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Allocation counters for a [`KernelHeap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapStats {
    /// Successful allocations.
    pub allocations: usize,
    /// Blocks returned.
    pub frees: usize,
}

impl HeapStats {
    /// Blocks currently allocated.
    #[inline]
    pub const fn outstanding(&self) -> usize {
        self.allocations - self.frees
    }
}

/// A spin-locked first-fit heap over a fixed memory region.
pub struct KernelHeap {
    heap: Mutex<Heap>,
    allocations: AtomicUsize,
    frees: AtomicUsize,
}

impl KernelHeap {
    /// Create a heap with no backing memory. Every allocation fails until
    /// [`init`](Self::init) is called.
    pub const fn empty() -> Self {
        Self {
            heap: Mutex::new(Heap::empty()),
            allocations: AtomicUsize::new(0),
            frees: AtomicUsize::new(0),
        }
    }

    /// Hand a memory region to the heap.
    ///
    /// # Safety
    /// - `start..start + size` must be valid, writable and unused by anything
    ///   else for the lifetime of the heap
    /// - Must be called at most once per heap
    pub unsafe fn init(&self, start: *mut u8, size: usize) {
        // SAFETY: Caller guarantees the region is valid and exclusively ours
        unsafe {
            self.heap.lock().init(start, size);
        }
    }

    /// Total managed size in bytes.
    pub fn size(&self) -> usize {
        self.heap.lock().size()
    }

    /// Bytes currently handed out.
    pub fn used(&self) -> usize {
        self.heap.lock().used()
    }

    /// Snapshot of the allocation counters.
    pub fn stats(&self) -> HeapStats {
        HeapStats {
            allocations: self.allocations.load(Ordering::Acquire),
            frees: self.frees.load(Ordering::Acquire),
        }
    }
}

impl KernelAllocator for KernelHeap {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let ptr = self.heap.lock().allocate_first_fit(layout).ok()?;
        self.allocations.fetch_add(1, Ordering::AcqRel);
        Some(ptr)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: Caller guarantees ptr/layout came from allocate()
        unsafe {
            self.heap.lock().deallocate(ptr, layout);
        }
        self.frees.fetch_add(1, Ordering::AcqRel);
    }
}

/// Kernel heap size (64 KiB)
const HEAP_SIZE: usize = 64 * 1024;

/// Static heap memory region
static mut HEAP_MEMORY: [u8; HEAP_SIZE] = [0; HEAP_SIZE];

static HEAP_INIT: Once = Once::new();

/// The kernel heap used by system calls.
pub static KERNEL_HEAP: KernelHeap = KernelHeap::empty();

/// Initialize the kernel heap.
///
/// Safe to call more than once; only the first call hands `HEAP_MEMORY` to
/// the heap.
pub fn init_heap() {
    HEAP_INIT.call_once(|| {
        // SAFETY:
        // - HEAP_MEMORY is a valid static array
        // - Once guarantees this runs a single time
        // - No other code accesses HEAP_MEMORY directly
        unsafe {
            let heap_start = addr_of_mut!(HEAP_MEMORY) as *mut u8;
            KERNEL_HEAP.init(heap_start, HEAP_SIZE);
        }
        log::info!("kernel heap initialized ({} KiB)", HEAP_SIZE / 1024);
    });
}

/// Get the size of the kernel heap
pub fn heap_size() -> usize {
    HEAP_SIZE
}
