//! Addrmap: GPU Register Map

/// GPU Register Map
///
/// The GPU exposes a single implicit command-list queue.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GpuRegs {
    base: u32,
}

impl GpuRegs {
    /// Size in bytes of the register block
    pub const SIZE: usize = 0x4;

    #[inline(always)]
    #[must_use]
    pub const fn at(base: u32) -> Self {
        Self { base }
    }

    #[inline(always)]
    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// SUBMIT
    ///
    /// Writing the bus address of a command-list header hands the list to
    /// the GPU queue.
    #[inline(always)]
    #[must_use]
    pub const fn submit(&self) -> crate::reg::Reg<u32, crate::access::W> {
        crate::reg::Reg::at(self.base + 0x0)
    }
}
