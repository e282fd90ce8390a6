//! Simulated shared RAM.
//!
//! A word-aligned arena mapped at a configurable bus address. Regions and
//! completion cells are bump-allocated out of it, so every pointer the
//! producer hands to the simulated coprocessors translates to a bus
//! address inside the arena.

use core::cell::Cell;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicU32, Ordering};

use rvfm_core::CompletionCell;

use crate::error::SimError;

/// Word-aligned RAM arena shared by the host and the simulated coprocessors.
///
/// A bump allocator: nothing handed out is freed before the arena.
pub struct SimMemory {
    base: NonNull<u32>,
    words: usize,
    bus_base: u32,
    next: Cell<usize>,
}

impl SimMemory {
    /// Zeroed arena of `size` bytes (rounded up to whole words) at
    /// `bus_base`.
    pub fn new(bus_base: u32, size: usize) -> Self {
        let words = size.div_ceil(4);
        let storage = vec![0u32; words].into_boxed_slice();
        let base = NonNull::from(Box::leak(storage)).cast::<u32>();
        Self {
            base,
            words,
            bus_base,
            next: Cell::new(0),
        }
    }

    /// Arena size in bytes.
    pub fn size(&self) -> usize {
        self.words * 4
    }

    /// Bus address of the arena's first byte.
    pub fn bus_base(&self) -> u32 {
        self.bus_base
    }

    /// Bytes handed out so far.
    pub fn used(&self) -> usize {
        self.next.get()
    }

    /// Bytes left for allocation.
    pub fn available(&self) -> usize {
        self.size() - self.used()
    }

    /// Carve a zeroed, word-aligned region out of the arena.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_region(&self, len: usize) -> Result<&mut [u8], SimError> {
        let ptr = self.alloc(len)?;
        // SAFETY: `alloc` hands out disjoint, in-bounds ranges that live as
        // long as `self`.
        Ok(unsafe { core::slice::from_raw_parts_mut(ptr.as_ptr(), len) })
    }

    /// Allocate a completion cell visible to the simulated coprocessors.
    pub fn alloc_cell(&self) -> Result<&CompletionCell, SimError> {
        let ptr = self.alloc(4)?;
        // SAFETY: the range is word aligned and zeroed; `CompletionCell` is
        // a transparent `AtomicU32`.
        Ok(unsafe { &*ptr.as_ptr().cast::<CompletionCell>() })
    }

    fn alloc(&self, len: usize) -> Result<NonNull<u8>, SimError> {
        let start = self.next.get().next_multiple_of(4);
        let available = self.size().saturating_sub(start);
        if len > available {
            return Err(SimError::OutOfMemory {
                requested: len,
                available,
            });
        }
        self.next.set(start + len);
        // SAFETY: `start + len <= size`.
        Ok(unsafe { NonNull::new_unchecked(self.base.as_ptr().cast::<u8>().add(start)) })
    }

    /// Bus address of a host pointer into the arena.
    pub fn bus_address(&self, ptr: *const u8) -> Result<u32, SimError> {
        let addr = ptr as usize;
        let base = self.base.as_ptr() as usize;
        if addr < base || addr >= base + self.size() {
            return Err(SimError::NotInRam { addr });
        }
        Ok(self.bus_base + (addr - base) as u32)
    }

    /// Whether `[addr, addr + len)` lies inside the arena.
    pub fn contains(&self, addr: u32, len: u32) -> bool {
        let start = addr as u64;
        let base = self.bus_base as u64;
        start >= base && start + len as u64 <= base + self.size() as u64
    }

    fn host_ptr(&self, addr: u32) -> *mut u8 {
        let offset = (addr - self.bus_base) as usize;
        // SAFETY: callers check `contains` first.
        unsafe { self.base.as_ptr().cast::<u8>().add(offset) }
    }

    /// Copy `out.len()` bytes starting at bus address `addr`.
    pub fn read(&self, addr: u32, out: &mut [u8]) -> bool {
        let Ok(len) = u32::try_from(out.len()) else {
            return false;
        };
        if !self.contains(addr, len) {
            return false;
        }
        // SAFETY: in bounds; the producer does not write a region while its
        // list is queued.
        unsafe { core::ptr::copy_nonoverlapping(self.host_ptr(addr), out.as_mut_ptr(), out.len()) };
        true
    }

    /// Little-endian word at `addr`, or `None` outside the arena.
    pub fn read_u32(&self, addr: u32) -> Option<u32> {
        let mut raw = [0u8; 4];
        self.read(addr, &mut raw).then(|| u32::from_le_bytes(raw))
    }

    /// Store `value` the way a coprocessor signals a cell.
    ///
    /// Fails for unaligned or unmapped addresses.
    pub fn store_u32(&self, addr: u32, value: u32) -> bool {
        if addr % 4 != 0 || !self.contains(addr, 4) {
            return false;
        }
        // SAFETY: aligned, in bounds, and every host-side access to a cell
        // goes through `CompletionCell`'s atomics.
        let cell = unsafe { AtomicU32::from_ptr(self.host_ptr(addr).cast::<u32>()) };
        cell.store(value, Ordering::Release);
        true
    }
}

impl Drop for SimMemory {
    fn drop(&mut self) {
        let slice = core::ptr::slice_from_raw_parts_mut(self.base.as_ptr(), self.words);
        // SAFETY: `base` came from `Box::leak` of a slice of `words` words,
        // and every borrow handed out ends with `self`.
        drop(unsafe { Box::from_raw(slice) });
    }
}

impl core::fmt::Debug for SimMemory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimMemory")
            .field("bus_base", &format_args!("{:#010X}", self.bus_base))
            .field("size", &self.size())
            .field("used", &self.used())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_word_aligned_and_disjoint() {
        let memory = SimMemory::new(0x1000, 64);
        let a = memory.alloc_region(5).unwrap();
        let a_addr = memory.bus_address(a.as_ptr()).unwrap();
        let b = memory.alloc_region(8).unwrap();
        let b_addr = memory.bus_address(b.as_ptr()).unwrap();
        assert_eq!(a_addr, 0x1000);
        assert_eq!(b_addr, 0x1008);
        assert_eq!(memory.used(), 16);
    }

    #[test]
    fn exhausting_the_arena_fails() {
        let memory = SimMemory::new(0x1000, 16);
        memory.alloc_region(12).unwrap();
        assert!(matches!(
            memory.alloc_region(8),
            Err(SimError::OutOfMemory {
                requested: 8,
                available: 4
            })
        ));
    }

    #[test]
    fn cells_see_coprocessor_stores() {
        let memory = SimMemory::new(0x2000, 32);
        let cell = memory.alloc_cell().unwrap();
        let addr = memory.bus_address(cell.as_ptr()).unwrap();
        assert!(memory.store_u32(addr, 7));
        assert_eq!(cell.load(), 7);
        assert!(!memory.store_u32(addr + 1, 7), "unaligned store refused");
        assert!(!memory.store_u32(0x2000 + 32, 7), "store past the arena refused");
    }

    #[test]
    fn foreign_pointers_do_not_translate() {
        let memory = SimMemory::new(0x1000, 16);
        let outside = [0u8; 4];
        assert!(memory.bus_address(outside.as_ptr()).is_err());
    }
}
