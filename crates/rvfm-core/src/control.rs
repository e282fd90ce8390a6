//! SPU run control and interrupt routing.

use rvfm_hal::RegisterBus;
use rvfm_registers::components::intc_regs::irq_enable::IrqEnableReg;
use rvfm_registers::components::intc_regs::irq_pending::IrqPendingReg;
use rvfm_registers::components::intc_regs::irq_target::IrqTargetReg;
use rvfm_registers::components::spu_regs::{run_mode::RunModeReg, sample_rate::SampleRateReg};

use crate::submit::Hardware;

pub use rvfm_registers::components::hart_e::HartE as Hart;
pub use rvfm_registers::components::interrupt_e::InterruptE as Interrupt;
pub use rvfm_registers::components::sample_rate_e::SampleRateE as SampleRate;

impl<B: RegisterBus> Hardware<B> {
    /// Select the rate the sample counter advances at.
    pub fn set_spu_sample_rate(&mut self, rate: SampleRate) -> Result<(), B::Error> {
        let mut value = SampleRateReg::default();
        value.set_rate(rate);
        let reg = self.regs().spu.sample_rate();
        self.write(reg, value)
    }

    /// Let the SPU take lists from its queues.
    pub fn start_spu(&mut self) -> Result<(), B::Error> {
        self.set_spu_running(true)
    }

    pub fn stop_spu(&mut self) -> Result<(), B::Error> {
        self.set_spu_running(false)
    }

    fn set_spu_running(&mut self, running: bool) -> Result<(), B::Error> {
        let mut value = RunModeReg::default();
        value.set_running(running);
        let reg = self.regs().spu.run_mode();
        self.write(reg, value)
    }

    pub fn spu_running(&mut self) -> Result<bool, B::Error> {
        let reg = self.regs().spu.run_mode();
        Ok(self.read(reg)?.running())
    }

    /// Samples produced since the SPU was started.
    pub fn spu_sample_counter(&mut self) -> Result<u32, B::Error> {
        let reg = self.regs().spu.sample_counter();
        self.read(reg)
    }

    /// Gate `irq` at the interrupt controller.
    pub fn enable_interrupt(&mut self, irq: Interrupt, enabled: bool) -> Result<(), B::Error> {
        let mut value = IrqEnableReg::default();
        value.set_enabled(enabled);
        let reg = self.regs().intc.enable(irq);
        self.write(reg, value)
    }

    /// Route `irq` to `hart`.
    pub fn set_interrupt_target(&mut self, irq: Interrupt, hart: Hart) -> Result<(), B::Error> {
        let mut value = IrqTargetReg::default();
        value.set_hart(hart);
        let reg = self.regs().intc.target(irq);
        self.write(reg, value)
    }

    /// Whether `irq` has fired and not been cleared.
    pub fn interrupt_pending(&mut self, irq: Interrupt) -> Result<bool, B::Error> {
        let reg = self.regs().intc.pending(irq);
        Ok(self.read(reg)?.pending())
    }

    /// Acknowledge `irq`. Handlers must do this even though the polled
    /// cell, not the interrupt, carries the completion.
    pub fn clear_interrupt(&mut self, irq: Interrupt) -> Result<(), B::Error> {
        let reg = self.regs().intc.pending(irq);
        self.write(reg, IrqPendingReg::CLEAR)
    }
}
