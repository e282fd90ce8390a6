//! Waiting on the simulated machine.

use rvfm_core::WaitStrategy;

use crate::error::SimError;
use crate::machine::SimMachine;

/// Runs the simulated coprocessors instead of sleeping.
///
/// Each wait steps the machine once. When `stall_limit` consecutive waits
/// find nothing to run, whatever the caller is waiting on can never be
/// signalled and the wait fails with [`SimError::Stalled`].
#[derive(Debug)]
pub struct SimWait<'m> {
    machine: &'m SimMachine,
    idle: usize,
    waits: usize,
}

impl<'m> SimWait<'m> {
    /// A wait strategy that steps `machine`.
    pub fn new(machine: &'m SimMachine) -> Self {
        Self {
            machine,
            idle: 0,
            waits: 0,
        }
    }

    /// Waits performed so far.
    pub fn waits(&self) -> usize {
        self.waits
    }
}

impl WaitStrategy for SimWait<'_> {
    type Error = SimError;

    fn wait(&mut self) -> Result<(), Self::Error> {
        self.waits += 1;
        if self.machine.step() > 0 {
            self.idle = 0;
            return Ok(());
        }
        self.idle += 1;
        if self.idle >= self.machine.config().stall_limit {
            log::warn!("machine idle for {} waits", self.idle);
            return Err(SimError::Stalled { waits: self.waits });
        }
        Ok(())
    }
}
