//! Simulated User Address Space
//!
//! A [`UserMemory`] bridge backed by ordinary heap memory, for exercising
//! system calls on a host. The space is page-granular: each page carries its
//! own [`Access`] rights, and a copy in either direction can be made to fail
//! once to model a page disappearing between validation and copy.

use alloc::vec;
use alloc::vec::Vec;
use core::mem::size_of;
use core::ops::Range;

use spin::Mutex;

use super::address::{UserAddr, PAGE_SIZE};
use super::user::{Access, CopyFault, UserMemory};
use crate::security::Zeroize;

/// A one-shot injected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The next `copy_from_user` fails.
    CopyIn,
    /// The next `copy_to_user` fails.
    CopyOut,
}

/// Copy counters for a [`SimulatedUserSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyStats {
    pub copies_in: usize,
    pub copies_out: usize,
}

struct SimState {
    memory: Vec<u8>,
    pages: Vec<Access>,
    armed: Option<Fault>,
    stats: CopyStats,
}

impl SimState {
    /// Byte range inside `memory`, or `None` if any part lies outside.
    fn range(&self, base: UserAddr, addr: UserAddr, len: usize) -> Option<Range<usize>> {
        let start = addr.offset_from(base)?;
        let end = start.checked_add(len)?;
        if end > self.memory.len() {
            return None;
        }
        Some(start..end)
    }

    /// Check every page touched by `range` grants `access`.
    fn permits(&self, range: &Range<usize>, access: Access) -> bool {
        if range.is_empty() {
            return true;
        }
        let first = range.start / PAGE_SIZE;
        let last = (range.end - 1) / PAGE_SIZE;
        self.pages[first..=last].iter().all(|page| page.contains(access))
    }
}

/// A fake user address space starting at a page-aligned base address.
pub struct SimulatedUserSpace {
    base: UserAddr,
    state: Mutex<SimState>,
}

impl SimulatedUserSpace {
    /// Map `pages` read/write pages at `base`.
    ///
    /// # Panics
    /// Panics if `base` is null or not page-aligned.
    pub fn new(base: UserAddr, pages: usize) -> Self {
        assert!(!base.is_null() && base.is_page_aligned(), "bad base {}", base);
        Self {
            base,
            state: Mutex::new(SimState {
                memory: vec![0; pages * PAGE_SIZE],
                pages: vec![Access::READ | Access::WRITE; pages],
                armed: None,
                stats: CopyStats::default(),
            }),
        }
    }

    /// Lowest mapped address.
    pub fn base(&self) -> UserAddr {
        self.base
    }

    /// One past the highest mapped address.
    pub fn end(&self) -> UserAddr {
        let len = self.state.lock().memory.len();
        UserAddr::new(self.base.as_usize() + len)
    }

    /// Address `offset` bytes into the space.
    pub fn addr(&self, offset: usize) -> UserAddr {
        UserAddr::new(self.base.as_usize() + offset)
    }

    /// Set the rights of every page overlapping `addr..addr + len`.
    ///
    /// Pages that lose all rights are scrubbed, as an unmap would.
    ///
    /// # Panics
    /// Panics if the range is not inside the space.
    pub fn protect(&self, addr: UserAddr, len: usize, access: Access) {
        let mut state = self.state.lock();
        let range = state
            .range(self.base, addr, len)
            .unwrap_or_else(|| panic!("protect outside space: {} + {}", addr, len));
        if range.is_empty() {
            return;
        }
        let first = range.start / PAGE_SIZE;
        let last = (range.end - 1) / PAGE_SIZE;
        for page in first..=last {
            state.pages[page] = access;
            if access.is_empty() {
                state.memory[page * PAGE_SIZE..(page + 1) * PAGE_SIZE].zeroize();
            }
        }
    }

    /// Make the next copy in the given direction fail.
    pub fn arm_fault(&self, fault: Fault) {
        self.state.lock().armed = Some(fault);
    }

    /// Store `values` at `addr` in native byte order, bypassing rights.
    pub fn write_values(&self, addr: UserAddr, values: &[i32]) {
        let mut state = self.state.lock();
        let len = values.len() * size_of::<i32>();
        let range = state
            .range(self.base, addr, len)
            .unwrap_or_else(|| panic!("write outside space: {} + {}", addr, len));
        for (chunk, value) in state.memory[range]
            .chunks_exact_mut(size_of::<i32>())
            .zip(values)
        {
            chunk.copy_from_slice(&value.to_ne_bytes());
        }
    }

    /// Load `count` values from `addr`, bypassing rights.
    pub fn read_values(&self, addr: UserAddr, count: usize) -> Vec<i32> {
        let state = self.state.lock();
        let len = count * size_of::<i32>();
        let range = state
            .range(self.base, addr, len)
            .unwrap_or_else(|| panic!("read outside space: {} + {}", addr, len));
        state.memory[range]
            .chunks_exact(size_of::<i32>())
            .map(|chunk| i32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    /// Successful copies so far.
    pub fn stats(&self) -> CopyStats {
        self.state.lock().stats
    }
}

impl UserMemory for SimulatedUserSpace {
    fn access_ok(&self, addr: UserAddr, len: usize, access: Access) -> bool {
        if addr.is_null() {
            return false;
        }
        let state = self.state.lock();
        match state.range(self.base, addr, len) {
            Some(range) => state.permits(&range, access),
            None => false,
        }
    }

    fn copy_from_user(&self, dst: &mut [u8], src: UserAddr) -> Result<(), CopyFault> {
        let fault = CopyFault {
            addr: src,
            len: dst.len(),
        };
        let mut state = self.state.lock();
        if state.armed == Some(Fault::CopyIn) {
            state.armed = None;
            return Err(fault);
        }
        let range = state.range(self.base, src, dst.len()).ok_or(fault)?;
        if !state.permits(&range, Access::READ) {
            return Err(fault);
        }
        dst.copy_from_slice(&state.memory[range]);
        state.stats.copies_in += 1;
        Ok(())
    }

    fn copy_to_user(&self, dst: UserAddr, src: &[u8]) -> Result<(), CopyFault> {
        let fault = CopyFault {
            addr: dst,
            len: src.len(),
        };
        let mut state = self.state.lock();
        if state.armed == Some(Fault::CopyOut) {
            state.armed = None;
            return Err(fault);
        }
        let range = state.range(self.base, dst, src.len()).ok_or(fault)?;
        if !state.permits(&range, Access::WRITE) {
            return Err(fault);
        }
        state.memory[range].copy_from_slice(src);
        state.stats.copies_out += 1;
        Ok(())
    }
}
