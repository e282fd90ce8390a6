//! Register: IRQ_ENABLE

/// IRQ_ENABLE
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct IrqEnableReg(u32);

impl core::default::Default for IrqEnableReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for IrqEnableReg {
    fn from_raw(val: u32) -> Self {
        Self(val)
    }

    fn to_raw(self) -> u32 {
        self.0
    }
}

impl IrqEnableReg {
    pub const ENABLED_OFFSET: usize = 0;
    pub const ENABLED_WIDTH: usize = 1;
    pub const ENABLED_MASK: u32 = 0x1;

    /// ENABLED
    #[inline(always)]
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.0 != 0
    }

    /// ENABLED
    #[inline(always)]
    pub fn set_enabled(&mut self, val: bool) {
        self.0 = (self.0 & !(Self::ENABLED_MASK << Self::ENABLED_OFFSET))
            | ((val as u32) << Self::ENABLED_OFFSET);
    }
}

impl core::fmt::Debug for IrqEnableReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IrqEnableReg")
            .field("enabled", &self.enabled())
            .finish()
    }
}
