//! Completion cells shared between a producer hart and the coprocessors.
//!
//! Two signals exist per submission and they are not interchangeable:
//!
//! * the list's own fence, named in the header and set by the coprocessor
//!   once it has taken the list (tracked by [`InFlight`](crate::InFlight));
//! * [`EffectFlag`]s, written by specific commands inside a list when the
//!   coprocessor reaches them (present, write-flag).

use core::num::NonZeroU32;
use core::sync::atomic::{AtomicU32, Ordering};

use rvfm_hal::{RegisterBus, WaitStrategy};

use crate::submit::Hardware;

/// A shared 32-bit cell. Zero means pending, any other value is a signal.
///
/// Every observation is a fresh atomic load.
#[repr(transparent)]
#[derive(Default)]
pub struct CompletionCell(AtomicU32);

impl CompletionCell {
    /// A pending cell.
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Return the cell to pending.
    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }

    /// Current value, with acquire ordering.
    pub fn load(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    /// Any non-zero value counts as signalled.
    pub fn is_signaled(&self) -> bool {
        self.load() != 0
    }

    /// Store `value`, as a consumer would.
    pub fn signal(&self, value: u32) {
        self.0.store(value, Ordering::Release);
    }

    /// Host address of the cell, for translation to a bus address.
    pub fn as_ptr(&self) -> *const u8 {
        self.0.as_ptr().cast_const().cast()
    }

    /// Observe the cell until `done` accepts its value, idling through
    /// `wait` between observations.
    pub fn wait_until<W, F>(&self, wait: &mut W, done: F) -> Result<u32, W::Error>
    where
        W: WaitStrategy,
        F: Fn(u32) -> bool,
    {
        loop {
            let value = self.load();
            if done(value) {
                return Ok(value);
            }
            wait.wait()?;
        }
    }
}

impl core::fmt::Debug for CompletionCell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("CompletionCell").field(&self.load()).finish()
    }
}

/// A completion cell armed to observe one in-list effect.
///
/// Carries the bus address commands write to and the value that marks the
/// effect as done.
#[derive(Clone, Copy)]
pub struct EffectFlag<'c> {
    cell: &'c CompletionCell,
    address: u32,
    value: NonZeroU32,
}

impl<'c> EffectFlag<'c> {
    /// Value a GPU present command writes when the texture is on screen.
    pub const PRESENTED: NonZeroU32 = NonZeroU32::MIN;

    /// Reset `cell` and bind it to the bus address the coprocessors see.
    pub fn arm<B: RegisterBus>(
        cell: &'c CompletionCell,
        hw: &Hardware<B>,
        value: NonZeroU32,
    ) -> Result<Self, B::Error> {
        let address = hw.bus_address(cell.as_ptr())?;
        cell.reset();
        Ok(Self {
            cell,
            address,
            value,
        })
    }

    /// Arm a flag for a GPU present command.
    pub fn arm_present<B: RegisterBus>(
        cell: &'c CompletionCell,
        hw: &Hardware<B>,
    ) -> Result<Self, B::Error> {
        Self::arm(cell, hw, Self::PRESENTED)
    }

    /// Bus address the write-flag command targets.
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Value the command stores.
    pub fn value(&self) -> u32 {
        self.value.get()
    }

    pub fn cell(&self) -> &'c CompletionCell {
        self.cell
    }

    /// Whether the effect has been observed.
    pub fn is_set(&self) -> bool {
        self.cell.load() == self.value.get()
    }

    /// Reset the cell for another round of the same effect.
    pub fn rearm(&self) {
        self.cell.reset();
    }

    /// Idle through `wait` until the cell holds this flag's value.
    pub fn wait<W: WaitStrategy>(&self, wait: &mut W) -> Result<(), W::Error> {
        let expected = self.value.get();
        self.cell.wait_until(wait, |v| v == expected)?;
        Ok(())
    }
}

impl core::fmt::Debug for EffectFlag<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EffectFlag")
            .field("address", &format_args!("{:#010X}", self.address))
            .field("value", &self.value)
            .field("current", &self.cell.load())
            .finish()
    }
}
