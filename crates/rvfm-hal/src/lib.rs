#![no_std]

/// Abstracts access to the rvfm memory-mapped register space.
///
/// Every observation goes to the bus; implementations must not cache
/// register values between calls.
pub trait RegisterBus {
    type Error: core::fmt::Debug;

    /// Write a 32-bit value to the register at `addr`.
    fn write_register(&mut self, addr: u32, value: u32) -> Result<(), Self::Error>;

    /// Read the 32-bit register at `addr`.
    fn read_register(&mut self, addr: u32) -> Result<u32, Self::Error>;

    /// Translate a producer-side pointer into the 32-bit address the
    /// coprocessors use to reach the same byte of shared RAM.
    ///
    /// Fails when the pointer does not lie in coprocessor-visible memory.
    fn bus_address(&self, ptr: *const u8) -> Result<u32, Self::Error>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    type Error = B::Error;

    fn write_register(&mut self, addr: u32, value: u32) -> Result<(), Self::Error> {
        (**self).write_register(addr, value)
    }

    fn read_register(&mut self, addr: u32) -> Result<u32, Self::Error> {
        (**self).read_register(addr)
    }

    fn bus_address(&self, ptr: *const u8) -> Result<u32, Self::Error> {
        (**self).bus_address(ptr)
    }
}

/// Abstracts how a hart idles between two observations of a shared cell.
///
/// A wait returns once the caller should look at memory again. It carries
/// no information about what changed: the polled cell stays the single
/// source of truth, so spurious wake-ups are always allowed.
pub trait WaitStrategy {
    type Error: core::fmt::Debug;

    /// Block until the next observation is worthwhile.
    ///
    /// Strategies that bound their own waiting report it through `Err`.
    fn wait(&mut self) -> Result<(), Self::Error>;
}

impl<W: WaitStrategy + ?Sized> WaitStrategy for &mut W {
    type Error = W::Error;

    fn wait(&mut self) -> Result<(), Self::Error> {
        (**self).wait()
    }
}
