//! Register: SUBMISSION_ERROR

use crate::components::submission_error_e::SubmissionErrorE;

/// SUBMISSION_ERROR
///
/// Best-effort status shared by all SPU queues. Zero means no error has
/// been latched since the register was last cleared.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct SubmissionErrorReg(u32);

impl core::default::Default for SubmissionErrorReg {
    fn default() -> Self {
        Self(0x0)
    }
}

impl crate::reg::Register for SubmissionErrorReg {
    fn from_raw(val: u32) -> Self {
        Self(val)
    }

    fn to_raw(self) -> u32 {
        self.0
    }
}

impl SubmissionErrorReg {
    pub const CODE_OFFSET: usize = 0;
    pub const CODE_WIDTH: usize = 8;
    pub const CODE_MASK: u32 = 0xFF;

    /// Raw register contents.
    #[inline(always)]
    #[must_use]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// CODE
    #[inline(always)]
    #[must_use]
    pub const fn code(&self) -> u8 {
        ((self.0 >> Self::CODE_OFFSET) & Self::CODE_MASK) as u8
    }

    /// CODE
    #[inline(always)]
    pub fn set_code(&mut self, val: u8) {
        self.0 = (self.0 & !(Self::CODE_MASK << Self::CODE_OFFSET))
            | (((val as u32) & Self::CODE_MASK) << Self::CODE_OFFSET);
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.0 != 0
    }

    /// The latched error, if the code is one of the known reasons.
    #[inline(always)]
    #[must_use]
    pub const fn error(&self) -> Option<SubmissionErrorE> {
        match SubmissionErrorE::from_bits(self.code()) {
            Ok(e) => Some(e),
            Err(_) => None,
        }
    }
}

impl From<SubmissionErrorE> for SubmissionErrorReg {
    fn from(e: SubmissionErrorE) -> Self {
        Self(e.bits() as u32)
    }
}

impl core::fmt::Debug for SubmissionErrorReg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SubmissionErrorReg")
            .field("code", &self.code())
            .finish()
    }
}
