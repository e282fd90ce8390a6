//! Simulator configuration.

use rvfm_registers::{RAM_END, RAM_START};

use crate::error::SimError;

/// Largest queue depth a simulated queue can be configured with.
pub const MAX_QUEUE_DEPTH: usize = 16;

/// Largest list the coprocessors accept, in bytes.
pub const MAX_LIST_LEN: u32 = 1024 * 1024;

/// Shape and limits of a simulated machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Bus address of the first byte of the RAM arena.
    pub ram_base: u32,
    /// Size of the RAM arena in bytes.
    pub ram_size: usize,
    /// Longest list accepted before the header is rejected.
    pub max_list_len: u32,
    /// Lists each queue holds before rejecting submissions.
    pub queue_depth: usize,
    /// Waits without progress before `SimWait` gives up.
    pub stall_limit: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ram_base: 0x0001_0000,
            ram_size: 4 * 1024 * 1024,
            max_list_len: MAX_LIST_LEN,
            queue_depth: 4,
            stall_limit: 64,
        }
    }
}

impl SimConfig {
    /// Check that the arena lies in shared RAM and the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.ram_size == 0 || self.ram_size % 4 != 0 {
            return Err(SimError::InvalidConfig(format!(
                "ram_size {} must be a non-zero multiple of 4",
                self.ram_size
            )));
        }
        if self.ram_base % 4 != 0 {
            return Err(SimError::InvalidConfig(format!(
                "ram_base {:#x} must be word aligned",
                self.ram_base
            )));
        }
        let end = self.ram_base as u64 + self.ram_size as u64 - 1;
        if (self.ram_base as u64) < RAM_START as u64 || end > RAM_END as u64 {
            return Err(SimError::InvalidConfig(format!(
                "arena {:#x}..={:#x} is outside shared RAM",
                self.ram_base, end
            )));
        }
        if self.queue_depth == 0 || self.queue_depth > MAX_QUEUE_DEPTH {
            return Err(SimError::InvalidConfig(format!(
                "queue_depth {} must be in 1..={}",
                self.queue_depth, MAX_QUEUE_DEPTH
            )));
        }
        if self.stall_limit == 0 {
            return Err(SimError::InvalidConfig("stall_limit must be non-zero".into()));
        }
        Ok(())
    }
}
