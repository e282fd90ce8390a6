//! Addrmap: SPU Register Map

use crate::components::spu_queue_e::SpuQueueE;

/// Named types defined within this component's body
pub mod named_types {
    pub mod run_mode_reg;
    pub mod sample_rate_reg;
    pub mod submission_error_reg;
}

pub use crate::components::spu_regs::named_types::run_mode_reg as run_mode;
pub use crate::components::spu_regs::named_types::sample_rate_reg as sample_rate;
pub use crate::components::spu_regs::named_types::submission_error_reg as submission_error;

/// SPU Register Map
///
/// Four independent command-list queues, each with its own submission port.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SpuRegs {
    base: u32,
}

impl SpuRegs {
    /// Size in bytes of the register block
    pub const SIZE: usize = 0x20;

    /// Offset of the first queue's submission port
    pub const SUBMIT_OFFSET: u32 = 0x10;

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

    /// RUN_MODE
    #[inline(always)]
    #[must_use]
    pub const fn run_mode(&self) -> crate::reg::Reg<run_mode::RunModeReg, crate::access::RW> {
        crate::reg::Reg::at(self.base + 0x0)
    }

    /// SAMPLE_COUNTER
    ///
    /// Free-running count of output samples since the SPU started.
    #[inline(always)]
    #[must_use]
    pub const fn sample_counter(&self) -> crate::reg::Reg<u32, crate::access::R> {
        crate::reg::Reg::at(self.base + 0x4)
    }

    /// SAMPLE_RATE
    #[inline(always)]
    #[must_use]
    pub const fn sample_rate(
        &self,
    ) -> crate::reg::Reg<sample_rate::SampleRateReg, crate::access::RW> {
        crate::reg::Reg::at(self.base + 0x8)
    }

    /// SUBMISSION_ERROR
    ///
    /// Latched by any queue that drops a list. Not correlated with the
    /// list that caused it. Write zero to clear.
    #[inline(always)]
    #[must_use]
    pub const fn submission_error(
        &self,
    ) -> crate::reg::Reg<submission_error::SubmissionErrorReg, crate::access::RW> {
        crate::reg::Reg::at(self.base + 0xC)
    }

    /// SUBMIT
    ///
    /// Per-queue submission port at `SUBMIT_OFFSET + 4 * queue`.
    #[inline(always)]
    #[must_use]
    pub const fn submit(&self, queue: SpuQueueE) -> crate::reg::Reg<u32, crate::access::W> {
        crate::reg::Reg::at(self.base + Self::SUBMIT_OFFSET + 4 * queue.bits() as u32)
    }
}
