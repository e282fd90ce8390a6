//! Wait strategies for real harts.

use core::convert::Infallible;

use rvfm_core::{Hardware, Hart, Interrupt, RegisterBus, WaitStrategy};

use crate::hart::wait_for_interrupt;

/// Busy polling. Never gives up.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinWait;

impl WaitStrategy for SpinWait {
    type Error = Infallible;

    fn wait(&mut self) -> Result<(), Self::Error> {
        core::hint::spin_loop();
        Ok(())
    }
}

/// Sleeps in `wfi` until `irq` fires, then acknowledges it.
///
/// The interrupt only wakes the hart; completion is still read from the
/// polled cell after every wake-up.
pub struct InterruptWait<'h, B: RegisterBus> {
    hw: &'h mut Hardware<B>,
    irq: Interrupt,
    wakeups: u32,
}

impl<'h, B: RegisterBus> InterruptWait<'h, B> {
    /// Route `irq` to `hart` and enable it.
    ///
    /// `hart` must be the one that will call [`WaitStrategy::wait`], usually
    /// [`current_hart`](crate::current_hart).
    ///
    /// # Errors
    ///
    /// Propagates the bus error from either register write.
    pub fn new(hw: &'h mut Hardware<B>, irq: Interrupt, hart: Hart) -> Result<Self, B::Error> {
        hw.set_interrupt_target(irq, hart)?;
        hw.enable_interrupt(irq, true)?;
        log::debug!("waiting on {:?} interrupt from {:?}", irq, hart);
        Ok(Self {
            hw,
            irq,
            wakeups: 0,
        })
    }

    /// Wake-ups seen so far.
    pub fn wakeups(&self) -> u32 {
        self.wakeups
    }

    /// Disable the interrupt and give the hardware back.
    pub fn finish(self) -> Result<&'h mut Hardware<B>, B::Error> {
        self.hw.enable_interrupt(self.irq, false)?;
        Ok(self.hw)
    }
}

impl<B: RegisterBus> WaitStrategy for InterruptWait<'_, B> {
    type Error = B::Error;

    fn wait(&mut self) -> Result<(), Self::Error> {
        // A pending line keeps wfi from sleeping, so an interrupt raised
        // before this point is not lost.
        wait_for_interrupt();
        if self.hw.interrupt_pending(self.irq)? {
            self.hw.clear_interrupt(self.irq)?;
            self.wakeups += 1;
        }
        Ok(())
    }
}
