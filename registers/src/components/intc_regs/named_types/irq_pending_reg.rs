//! Register: IRQ_PENDING

/// IRQ_PENDING
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct IrqPendingReg(u32);

impl core::default::Default for IrqPendingReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for IrqPendingReg {
    fn from_raw(val: u32) -> Self {
        Self(val)
    }

    fn to_raw(self) -> u32 {
        self.0
    }
}

impl IrqPendingReg {
    /// Value that acknowledges the interrupt when written.
    pub const CLEAR: Self = Self(0x1);

    /// PENDING
    #[inline(always)]
    #[must_use]
    pub const fn pending(&self) -> bool {
        self.0 != 0
    }
}

impl core::fmt::Debug for IrqPendingReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IrqPendingReg")
            .field("pending", &self.pending())
            .finish()
    }
}
