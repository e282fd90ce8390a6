//! Register: SAMPLE_RATE

use crate::components::sample_rate_e::SampleRateE;

/// SAMPLE_RATE
///
/// Output sample rate selector.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct SampleRateReg(u32);

impl core::default::Default for SampleRateReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for SampleRateReg {
    fn from_raw(val: u32) -> Self {
        Self(val)
    }

    fn to_raw(self) -> u32 {
        self.0
    }
}

impl SampleRateReg {
    pub const RATE_OFFSET: usize = 0;
    pub const RATE_WIDTH: usize = 2;
    pub const RATE_MASK: u32 = 0x3;

    /// RATE
    ///
    /// # Errors
    /// Returns an error if the field holds a pattern with no rate assigned.
    #[inline(always)]
    pub const fn rate(&self) -> Result<SampleRateE, crate::encode::UnknownVariant<u8>> {
        let val = (self.0 >> Self::RATE_OFFSET) & Self::RATE_MASK;
        SampleRateE::from_bits(val as u8)
    }

    /// RATE
    #[inline(always)]
    pub fn set_rate(&mut self, val: SampleRateE) {
        let val = val.bits() as u32;
        self.0 = (self.0 & !(Self::RATE_MASK << Self::RATE_OFFSET))
            | ((val & Self::RATE_MASK) << Self::RATE_OFFSET);
    }
}

impl core::fmt::Debug for SampleRateReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SampleRateReg")
            .field("rate", &self.rate())
            .finish()
    }
}
