//! Hand-off of finished lists to coprocessor queues.

use core::fmt::Debug;
use core::marker::PhantomData;
use core::ptr::NonNull;
use core::sync::atomic::{self, Ordering};

use rvfm_hal::{RegisterBus, WaitStrategy};
use rvfm_registers::access::{self, W};
use rvfm_registers::reg::{Reg, Register};
use rvfm_registers::components::spu_regs::submission_error::SubmissionErrorReg;
use rvfm_registers::RegisterFile;

use crate::command_list::CommandList;
use crate::completion::CompletionCell;
use crate::error::SubmitError;
use crate::gpu::Gpu;
use crate::recorder::Coprocessor;
use crate::region::OwnedRegion;
use crate::spu::Spu;

pub use rvfm_registers::components::spu_queue_e::SpuQueueE as SpuQueue;

/// A queue that accepts lists for one coprocessor.
pub trait SubmissionTarget: Copy + Debug {
    type Coprocessor: Coprocessor;

    /// Port that receives header addresses for this queue.
    fn port(&self, regs: &RegisterFile) -> Reg<u32, W>;
}

/// The GPU's single implicit queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuQueue;

impl SubmissionTarget for GpuQueue {
    type Coprocessor = Gpu;

    fn port(&self, regs: &RegisterFile) -> Reg<u32, W> {
        regs.gpu.submit()
    }
}

impl SubmissionTarget for SpuQueue {
    type Coprocessor = Spu;

    fn port(&self, regs: &RegisterFile) -> Reg<u32, W> {
        regs.spu.submit(*self)
    }
}

/// Hardware-access capability: a register bus plus the register file it
/// reaches. Constructed once and passed to whatever needs the hardware.
pub struct Hardware<B: RegisterBus> {
    bus: B,
    regs: RegisterFile,
}

impl<B: RegisterBus> Hardware<B> {
    /// Pair `bus` with the register layout it reaches.
    pub fn new(bus: B, regs: RegisterFile) -> Self {
        Self { bus, regs }
    }

    /// Register descriptors for the machine behind the bus.
    pub fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// The underlying register bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the bus, for raw accesses outside the register file.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give up the capability and return the bus.
    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Read a register through its descriptor.
    ///
    /// # Errors
    ///
    /// Propagates the bus error.
    pub fn read<T: Register, A: access::Read>(&mut self, reg: Reg<T, A>) -> Result<T, B::Error> {
        let raw = self.bus.read_register(reg.addr())?;
        Ok(T::from_raw(raw))
    }

    /// Write a register through its descriptor.
    pub fn write<T: Register, A: access::Write>(
        &mut self,
        reg: Reg<T, A>,
        value: T,
    ) -> Result<(), B::Error> {
        self.bus.write_register(reg.addr(), value.to_raw())
    }

    /// Address the coprocessors use for `ptr`.
    pub fn bus_address(&self, ptr: *const u8) -> Result<u32, B::Error> {
        self.bus.bus_address(ptr)
    }

    /// Hand `list` to `target`, with `fence` as its consumption signal.
    ///
    /// The fence is reset and its address stored in the header before the
    /// header address reaches the port. The returned [`InFlight`] keeps the
    /// region until the coprocessor sets the fence.
    ///
    /// # Errors
    ///
    /// If the addresses cannot be translated or the port write fails, the
    /// list comes back inside the [`SubmitFailure`].
    pub fn submit<'a, 'c, T: SubmissionTarget>(
        &mut self,
        target: T,
        mut list: CommandList<'a, T::Coprocessor>,
        fence: &'c CompletionCell,
    ) -> Result<InFlight<'a, 'c, T::Coprocessor>, SubmitFailure<'a, T::Coprocessor, B::Error>> {
        let addresses = self
            .bus
            .bus_address(list.header_ptr())
            .and_then(|header| Ok((header, self.bus.bus_address(fence.as_ptr())?)));
        let (header_address, fence_address) = match addresses {
            Ok(pair) => pair,
            Err(e) => return Err(SubmitFailure::new(SubmitError::Bus(e), list)),
        };

        fence.reset();
        list.set_completion_address(fence_address);
        // Header and fence must be visible before the port write.
        atomic::fence(Ordering::Release);

        let port = target.port(&self.regs);
        if let Err(e) = self.write(port, header_address) {
            log::warn!("{:?} port write failed: {:?}", target, e);
            return Err(SubmitFailure::new(SubmitError::Bus(e), list));
        }

        log::debug!(
            "submitted {} byte {} list at {:#010x} to {:?}",
            list.len(),
            <T::Coprocessor as Coprocessor>::NAME,
            header_address,
            target
        );
        Ok(InFlight::new(list, fence, header_address))
    }

    /// Check the SPU's shared submission status.
    ///
    /// Best effort: a latched error belongs to some earlier submission on
    /// any queue.
    ///
    /// # Errors
    ///
    /// [`SubmitError::SubmissionRejected`] for a non-zero status, or the bus
    /// error if the register cannot be read.
    pub fn check_spu_submission(&mut self) -> Result<(), SubmitError<B::Error>> {
        let reg = self.regs.spu.submission_error();
        let status = self.read(reg)?;
        if status.is_set() {
            log::warn!("SPU submission error latched: {:?}", status);
            return Err(SubmitError::SubmissionRejected { status });
        }
        Ok(())
    }

    /// Write zero to the SPU submission status.
    pub fn clear_spu_submission_error(&mut self) -> Result<(), B::Error> {
        let reg = self.regs.spu.submission_error();
        self.write(reg, SubmissionErrorReg::default())
    }
}

impl<B: RegisterBus + Debug> Debug for Hardware<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hardware")
            .field("bus", &self.bus)
            .field("regs", &self.regs)
            .finish()
    }
}

/// A submitted list the coprocessor may still be reading.
///
/// Holds the region until the list's fence is observed set. The safe ways
/// back to the region go through that observation; [`InFlight::abandon`]
/// recovers the region of a list the coprocessor dropped.
///
/// Dropping an `InFlight` spins for at most [`InFlight::DROP_SPIN_LIMIT`]
/// observations of the fence. If the fence is still clear after that, the
/// region is leaked to the coprocessor: the borrow ends, but the backing
/// memory must not be written until the fence is set.
pub struct InFlight<'a, 'c, C: Coprocessor> {
    base: NonNull<u8>,
    region_len: usize,
    list_len: usize,
    header_address: u32,
    fence: &'c CompletionCell,
    _region: PhantomData<(&'a mut [u8], C)>,
}

impl<'a, 'c, C: Coprocessor> InFlight<'a, 'c, C> {
    /// Fence observations a dropped, unsignalled list gets before its
    /// region is leaked.
    pub const DROP_SPIN_LIMIT: u32 = 1 << 16;

    fn new(list: CommandList<'a, C>, fence: &'c CompletionCell, header_address: u32) -> Self {
        let list_len = list.len();
        let (base, region_len) = list.into_region().into_raw();
        Self {
            base,
            region_len,
            list_len,
            header_address,
            fence,
            _region: PhantomData,
        }
    }

    /// Bus address written to the submission port.
    pub fn header_address(&self) -> u32 {
        self.header_address
    }

    /// Payload length of the submitted list.
    pub fn len(&self) -> usize {
        self.list_len
    }

    /// True for a list with no commands.
    pub fn is_empty(&self) -> bool {
        self.list_len == 0
    }

    /// The cell the coprocessor sets when it takes the list.
    pub fn fence(&self) -> &'c CompletionCell {
        self.fence
    }

    /// Whether the coprocessor has taken the list.
    pub fn is_complete(&self) -> bool {
        self.fence.is_signaled()
    }

    /// Idle through `wait` until the fence is set.
    pub fn wait<W: WaitStrategy>(&self, wait: &mut W) -> Result<(), W::Error> {
        self.fence.wait_until(wait, |v| v != 0)?;
        Ok(())
    }

    /// Recover the region if the fence is already set.
    pub fn try_reclaim(self) -> Result<OwnedRegion<'a>, Self> {
        if self.is_complete() {
            Ok(self.release())
        } else {
            Err(self)
        }
    }

    /// Wait for the fence and recover the region.
    ///
    /// If the wait strategy gives up, the list stays in flight and is
    /// returned with the error.
    pub fn reclaim<W: WaitStrategy>(self, wait: &mut W) -> Result<OwnedRegion<'a>, (Self, W::Error)> {
        match self.wait(wait) {
            Ok(()) => Ok(self.release()),
            Err(e) => Err((self, e)),
        }
    }

    /// Recover the region of a list the coprocessor will never take.
    ///
    /// For submissions the coprocessor dropped (full queue, header outside
    /// RAM): their fence is never set, so [`InFlight::reclaim`] can only
    /// give up on them.
    ///
    /// # Safety
    ///
    /// The coprocessor must not read the list now or later. The SPU's
    /// submission status does not name the dropped list, so the caller
    /// needs its own evidence, such as a queue known to have been full or a
    /// coprocessor that has been reset.
    pub unsafe fn abandon(self) -> OwnedRegion<'a> {
        log::warn!(
            "abandoned {} list at {:#010x} (fence {})",
            C::NAME,
            self.header_address,
            self.fence.load()
        );
        self.take_region()
    }

    fn release(self) -> OwnedRegion<'a> {
        log::debug!("reclaimed {} list at {:#010x}", C::NAME, self.header_address);
        self.take_region()
    }

    fn take_region(self) -> OwnedRegion<'a> {
        let (base, len) = (self.base, self.region_len);
        core::mem::forget(self);
        // SAFETY: `self` was the only holder of the region, and callers
        // establish that the coprocessor no longer reads it (fence observed
        // set, or the list was dropped).
        unsafe { OwnedRegion::from_raw(base, len) }
    }
}

impl<C: Coprocessor> Drop for InFlight<'_, '_, C> {
    fn drop(&mut self) {
        for _ in 0..Self::DROP_SPIN_LIMIT {
            if self.fence.is_signaled() {
                return;
            }
            core::hint::spin_loop();
        }
        log::error!(
            "{} list at {:#010x} dropped before its fence was set; region leaked",
            C::NAME,
            self.header_address
        );
    }
}

impl<C: Coprocessor> Debug for InFlight<'_, '_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InFlight")
            .field("coprocessor", &C::NAME)
            .field("header_address", &format_args!("{:#010X}", self.header_address))
            .field("len", &self.list_len)
            .field("complete", &self.is_complete())
            .finish()
    }
}

/// A submission that did not reach the queue, with the list it carried.
pub struct SubmitFailure<'a, C: Coprocessor, E: Debug> {
    error: SubmitError<E>,
    list: CommandList<'a, C>,
}

impl<'a, C: Coprocessor, E: Debug> SubmitFailure<'a, C, E> {
    fn new(error: SubmitError<E>, list: CommandList<'a, C>) -> Self {
        Self { error, list }
    }

    /// Why the submission failed.
    pub fn error(&self) -> &SubmitError<E> {
        &self.error
    }

    /// The untouched list, ready to resubmit.
    pub fn into_list(self) -> CommandList<'a, C> {
        self.list
    }

    /// Both the error and the list.
    pub fn into_parts(self) -> (SubmitError<E>, CommandList<'a, C>) {
        (self.error, self.list)
    }
}

impl<C: Coprocessor, E: Debug> Debug for SubmitFailure<'_, C, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SubmitFailure")
            .field("error", &self.error)
            .field("list", &self.list)
            .finish()
    }
}

impl<C: Coprocessor, E: Debug> core::fmt::Display for SubmitFailure<'_, C, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} list not submitted: {}", C::NAME, self.error)
    }
}
