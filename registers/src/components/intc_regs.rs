//! Addrmap: Interrupt Controller Register Map

use crate::components::interrupt_e::InterruptE;

/// Named types defined within this component's body
pub mod named_types {
    pub mod irq_enable_reg;
    pub mod irq_pending_reg;
    pub mod irq_target_reg;
}

pub use crate::components::intc_regs::named_types::irq_enable_reg as irq_enable;
pub use crate::components::intc_regs::named_types::irq_pending_reg as irq_pending;
pub use crate::components::intc_regs::named_types::irq_target_reg as irq_target;

/// Interrupt Controller Register Map
///
/// One 16-byte block per interrupt line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IntcRegs {
    base: u32,
}

impl IntcRegs {
    /// Stride between two interrupt blocks
    pub const LINE_STRIDE: u32 = 0x10;

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

    #[inline(always)]
    const fn line(&self, irq: InterruptE) -> u32 {
        self.base + (irq.bits() as u32) * Self::LINE_STRIDE
    }

    /// ENABLE
    #[inline(always)]
    #[must_use]
    pub const fn enable(
        &self,
        irq: InterruptE,
    ) -> crate::reg::Reg<irq_enable::IrqEnableReg, crate::access::RW> {
        crate::reg::Reg::at(self.line(irq) + 0x0)
    }

    /// TARGET
    ///
    /// Hart that receives the interrupt.
    #[inline(always)]
    #[must_use]
    pub const fn target(
        &self,
        irq: InterruptE,
    ) -> crate::reg::Reg<irq_target::IrqTargetReg, crate::access::RW> {
        crate::reg::Reg::at(self.line(irq) + 0x4)
    }

    /// PENDING
    ///
    /// Reads non-zero while the interrupt is raised. Write one to clear.
    #[inline(always)]
    #[must_use]
    pub const fn pending(
        &self,
        irq: InterruptE,
    ) -> crate::reg::Reg<irq_pending::IrqPendingReg, crate::access::RW> {
        crate::reg::Reg::at(self.line(irq) + 0x8)
    }
}
