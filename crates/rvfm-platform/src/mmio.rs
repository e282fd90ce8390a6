//! Volatile register access on the real machine.

use rvfm_hal::RegisterBus;
use rvfm_registers::{RAM_END, RAM_START};

/// MMIO bus error for the rvfm platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmioError {
    /// Register accesses are whole 32-bit words.
    Misaligned { addr: u32 },
    /// The pointer is not in the shared RAM the coprocessors can reach.
    NotInRam { addr: usize },
}

impl core::fmt::Display for MmioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MmioError::Misaligned { addr } => write!(f, "misaligned register access at {addr:#010x}"),
            MmioError::NotInRam { addr } => write!(f, "address {addr:#x} is outside shared RAM"),
        }
    }
}

/// Register bus over the hart's physical address space.
///
/// Hart pointers and bus addresses coincide on rvfm, so translation is a
/// range check.
#[derive(Debug)]
pub struct MmioBus {
    _private: (),
}

impl MmioBus {
    /// # Safety
    ///
    /// Must run on rvfm hardware (or an emulator of it), where every
    /// address written through this bus is a device register. Concurrent
    /// buses on several harts are fine as long as each register has one
    /// writer at a time.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }

    fn check_aligned(addr: u32) -> Result<*mut u32, MmioError> {
        if addr & 0x3 != 0 {
            return Err(MmioError::Misaligned { addr });
        }
        Ok(addr as usize as *mut u32)
    }
}

impl RegisterBus for MmioBus {
    type Error = MmioError;

    fn write_register(&mut self, addr: u32, value: u32) -> Result<(), Self::Error> {
        let reg = Self::check_aligned(addr)?;
        // SAFETY: `new` requires every address to be a device register.
        unsafe { core::ptr::write_volatile(reg, value) };
        Ok(())
    }

    fn read_register(&mut self, addr: u32) -> Result<u32, Self::Error> {
        let reg = Self::check_aligned(addr)?;
        // SAFETY: as for `write_register`.
        Ok(unsafe { core::ptr::read_volatile(reg) })
    }

    fn bus_address(&self, ptr: *const u8) -> Result<u32, Self::Error> {
        let addr = ptr as usize;
        match u32::try_from(addr) {
            Ok(bus) if (RAM_START..=RAM_END).contains(&bus) => Ok(bus),
            _ => Err(MmioError::NotInRam { addr }),
        }
    }
}
