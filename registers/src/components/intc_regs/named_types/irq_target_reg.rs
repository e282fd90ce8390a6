//! Register: IRQ_TARGET

use crate::components::hart_e::HartE;

/// IRQ_TARGET
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct IrqTargetReg(u32);

impl core::default::Default for IrqTargetReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for IrqTargetReg {
    fn from_raw(val: u32) -> Self {
        Self(val)
    }

    fn to_raw(self) -> u32 {
        self.0
    }
}

impl IrqTargetReg {
    pub const HART_OFFSET: usize = 0;
    pub const HART_WIDTH: usize = 2;
    pub const HART_MASK: u32 = 0x3;

    /// HART
    #[inline(always)]
    #[must_use]
    pub const fn hart(&self) -> HartE {
        let val = (self.0 >> Self::HART_OFFSET) & Self::HART_MASK;
        match HartE::from_bits(val as u8) {
            Ok(h) => h,
            Err(_) => HartE::Hart0,
        }
    }

    /// HART
    #[inline(always)]
    pub fn set_hart(&mut self, val: HartE) {
        let val = val.bits() as u32;
        self.0 = (self.0 & !(Self::HART_MASK << Self::HART_OFFSET))
            | ((val & Self::HART_MASK) << Self::HART_OFFSET);
    }
}

impl core::fmt::Debug for IrqTargetReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IrqTargetReg")
            .field("hart", &self.hart())
            .finish()
    }
}
