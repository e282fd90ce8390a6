//! Register: RUN_MODE

/// RUN_MODE
///
/// Non-zero while the SPU is producing samples.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct RunModeReg(u32);

impl core::default::Default for RunModeReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for RunModeReg {
    fn from_raw(val: u32) -> Self {
        Self(val)
    }

    fn to_raw(self) -> u32 {
        self.0
    }
}

impl RunModeReg {
    pub const RUNNING_OFFSET: usize = 0;
    pub const RUNNING_WIDTH: usize = 1;
    pub const RUNNING_MASK: u32 = 0x1;

    /// RUNNING
    #[inline(always)]
    #[must_use]
    pub const fn running(&self) -> bool {
        self.0 != 0
    }

    /// RUNNING
    #[inline(always)]
    pub fn set_running(&mut self, val: bool) {
        self.0 = (self.0 & !(Self::RUNNING_MASK << Self::RUNNING_OFFSET))
            | ((val as u32) << Self::RUNNING_OFFSET);
    }
}

impl core::fmt::Debug for RunModeReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RunModeReg")
            .field("running", &self.running())
            .finish()
    }
}
